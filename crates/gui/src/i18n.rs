use std::sync::atomic::{AtomicU8, Ordering};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    En,
    Ru,
}

static CURRENT_LANG: AtomicU8 = AtomicU8::new(0); // 0=En (default)

pub fn lang() -> Lang {
    match CURRENT_LANG.load(Ordering::Relaxed) {
        1 => Lang::Ru,
        _ => Lang::En,
    }
}

pub fn set_lang(l: Lang) {
    CURRENT_LANG.store(
        match l {
            Lang::En => 0,
            Lang::Ru => 1,
        },
        Ordering::Relaxed,
    );
}

/// Translate a key to the current language.
pub fn t(key: &str) -> &'static str {
    let ru = lang() == Lang::Ru;
    match key {
        // ── Toolbar buttons ─────────────────────────────────
        "btn.line" => if ru { "Отрезок" } else { "Line" },
        "btn.triangle" => if ru { "Треугольник" } else { "Triangle" },
        "btn.rectangle" => if ru { "Прямоугольник" } else { "Rectangle" },
        "btn.polygon" => if ru { "Многоугольник" } else { "Polygon" },
        "btn.light" => if ru { "Источник света" } else { "Light" },
        "btn.mode" => if ru { "Режим" } else { "Mode" },
        "btn.width_up" => if ru { "Толщина +" } else { "Width +" },
        "btn.width_down" => if ru { "Толщина -" } else { "Width -" },
        "btn.solid" => if ru { "Сплошная" } else { "Solid" },
        "btn.dashed" => if ru { "Штрих" } else { "Dashed" },
        "btn.dotted" => if ru { "Точки" } else { "Dotted" },
        "btn.lighting" => if ru { "Освещение" } else { "Lighting" },
        "btn.bg_color" => if ru { "Цвет фона" } else { "Background" },
        "btn.accent_color" => if ru { "Цвет объекта" } else { "Object color" },
        "btn.prim_color" => if ru { "Цвет примитивов" } else { "Primitive color" },
        "btn.reset_camera" => if ru { "Сбросить камеру" } else { "Reset camera" },
        "btn.reset_rotation" => if ru { "Сбросить вращение" } else { "Reset rotation" },
        "btn.clear" => if ru { "Очистить сцену" } else { "Clear scene" },

        // ── Modal prompts ───────────────────────────────────
        "prompt.line" => if ru { "Отрезок: x1,y1,z1,x2,y2,z2" } else { "Line: x1,y1,z1,x2,y2,z2" },
        "prompt.triangle" => if ru {
            "Треугольник: x1,y1,z1,x2,y2,z2,x3,y3,z3"
        } else {
            "Triangle: x1,y1,z1,x2,y2,z2,x3,y3,z3"
        },
        "prompt.rectangle" => if ru {
            "Прямоугольник (противоположные углы): x1,y1,z1,x2,y2,z2"
        } else {
            "Rectangle (opposite corners): x1,y1,z1,x2,y2,z2"
        },
        "prompt.polygon" => if ru {
            "Многоугольник: x,y,z для трёх и более вершин"
        } else {
            "Polygon: x,y,z for three or more vertices"
        },
        "prompt.light" => if ru { "Источник света: x,y,z" } else { "Light: x,y,z" },
        "hint.enter" => if ru { "Enter: применить  Esc: отмена" } else { "Enter: apply  Esc: cancel" },

        // ── Palette captions ────────────────────────────────
        "picker.background" => if ru { "Выберите цвет фона" } else { "Pick background color" },
        "picker.accent_object" => if ru { "Выберите цвет объекта" } else { "Pick object color" },
        "picker.primitive" => if ru { "Выберите цвет примитивов" } else { "Pick primitive color" },

        // ── Status line ─────────────────────────────────────
        "status.ready" => if ru { "Готово" } else { "Ready" },
        "status.primitives" => if ru { "Примитивы" } else { "Primitives" },
        "status.lights" => if ru { "Источники" } else { "Lights" },
        "status.zoom" => if ru { "Дистанция" } else { "Distance" },
        "status.width" => if ru { "Толщина" } else { "Width" },
        "status.lighting_on" => if ru { "свет вкл" } else { "lighting on" },
        "status.lighting_off" => if ru { "свет выкл" } else { "lighting off" },
        "status.added" => if ru { "Добавлен примитив" } else { "Added" },
        "status.light_added" => if ru { "Добавлен источник света" } else { "Light added" },
        "status.light_inactive" => if ru {
            "Источник добавлен, но лимит слотов исчерпан"
        } else {
            "Light added, but all light slots are in use"
        },
        "status.cleared" => if ru { "Сцена очищена" } else { "Scene cleared" },
        "status.cancelled" => if ru { "Ввод отменён" } else { "Input cancelled" },
        "status.input_error" => if ru { "Ошибка ввода" } else { "Input error" },
        "status.color_set" => if ru { "Цвет установлен" } else { "Color set" },

        // ── Mode names ──────────────────────────────────────
        "mode.fill" => if ru { "заливка" } else { "fill" },
        "mode.wireframe" => if ru { "каркас" } else { "wireframe" },
        "mode.point" => if ru { "точки" } else { "points" },

        _ => "???",
    }
}
