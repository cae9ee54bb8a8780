use std::fmt;

use serde::{Deserialize, Serialize};

/// Точка в мировых координатах
pub type Point3 = [f32; 3];

/// Цвет RGBA, каналы в диапазоне [0, 1]
pub type Rgba = [f32; 4];

/// Ограничить каналы RGB диапазоном [0, 1] и добавить непрозрачную альфу
pub fn opaque(rgb: [f32; 3]) -> Rgba {
    [
        rgb[0].clamp(0.0, 1.0),
        rgb[1].clamp(0.0, 1.0),
        rgb[2].clamp(0.0, 1.0),
        1.0,
    ]
}

// ── Arity rules ──────────────────────────────────────────────

/// Тип структурированного числового ввода
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    #[default]
    Line,
    Triangle,
    Rectangle,
    Polygon,
    Light,
}

impl InputKind {
    /// Сколько чисел должен содержать ввод данного типа
    pub fn arity(self) -> ArityRule {
        match self {
            InputKind::Line => ArityRule::Exact(6),
            InputKind::Triangle => ArityRule::Exact(9),
            InputKind::Rectangle => ArityRule::Exact(6),
            InputKind::Polygon => ArityRule::AtLeastMultipleOf { min: 9, step: 3 },
            InputKind::Light => ArityRule::Exact(3),
        }
    }

    /// Примитив, который создаёт ввод; `None` для источника света
    pub fn primitive_kind(self) -> Option<PrimitiveKind> {
        match self {
            InputKind::Line => Some(PrimitiveKind::Line),
            InputKind::Triangle => Some(PrimitiveKind::Triangle),
            InputKind::Rectangle => Some(PrimitiveKind::Rectangle),
            InputKind::Polygon => Some(PrimitiveKind::Polygon),
            InputKind::Light => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            InputKind::Line => "line",
            InputKind::Triangle => "triangle",
            InputKind::Rectangle => "rectangle",
            InputKind::Polygon => "polygon",
            InputKind::Light => "light",
        }
    }

    pub fn all() -> &'static [InputKind] {
        &[
            InputKind::Line,
            InputKind::Triangle,
            InputKind::Rectangle,
            InputKind::Polygon,
            InputKind::Light,
        ]
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Правило допустимого количества чисел
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArityRule {
    Exact(usize),
    AtLeastMultipleOf { min: usize, step: usize },
}

impl ArityRule {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            ArityRule::Exact(n) => count == n,
            ArityRule::AtLeastMultipleOf { min, step } => count >= min && count % step == 0,
        }
    }
}

impl fmt::Display for ArityRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArityRule::Exact(n) => write!(f, "exactly {n} values"),
            ArityRule::AtLeastMultipleOf { min, step } => {
                write!(f, "at least {min} values in groups of {step}")
            }
        }
    }
}

/// Количество чисел не подходит для выбранного типа
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} expects {rule}, got {got}")]
pub struct ArityError {
    pub kind: InputKind,
    pub rule: ArityRule,
    pub got: usize,
}

/// Проверить `count` по правилу арности для `kind`
pub fn check_arity(kind: InputKind, count: usize) -> Result<(), ArityError> {
    let rule = kind.arity();
    if rule.accepts(count) {
        Ok(())
    } else {
        Err(ArityError {
            kind,
            rule,
            got: count,
        })
    }
}

// ── Primitives ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    Line,
    Triangle,
    Rectangle,
    Polygon,
}

impl PrimitiveKind {
    pub fn input_kind(self) -> InputKind {
        match self {
            PrimitiveKind::Line => InputKind::Line,
            PrimitiveKind::Triangle => InputKind::Triangle,
            PrimitiveKind::Rectangle => InputKind::Rectangle,
            PrimitiveKind::Polygon => InputKind::Polygon,
        }
    }
}

/// Геометрический примитив сцены.
///
/// Цвет фиксируется в момент создания и дальше не меняется.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Primitive {
    Line {
        points: [Point3; 2],
        color: Rgba,
    },
    Triangle {
        points: [Point3; 3],
        color: Rgba,
    },
    /// Противоположные углы прямоугольника; Z берётся у первого угла
    Rectangle {
        corners: [Point3; 2],
        color: Rgba,
    },
    Polygon {
        points: Vec<Point3>,
        color: Rgba,
    },
}

impl Primitive {
    /// Собрать примитив из плоского списка `x, y, z, x, y, z, ...`.
    ///
    /// При неверном количестве чисел ничего не создаётся.
    pub fn from_values(
        kind: PrimitiveKind,
        values: &[f32],
        color: Rgba,
    ) -> Result<Self, ArityError> {
        check_arity(kind.input_kind(), values.len())?;

        let points: Vec<Point3> = values
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect();

        Ok(match kind {
            PrimitiveKind::Line => Primitive::Line {
                points: [points[0], points[1]],
                color,
            },
            PrimitiveKind::Triangle => Primitive::Triangle {
                points: [points[0], points[1], points[2]],
                color,
            },
            PrimitiveKind::Rectangle => Primitive::Rectangle {
                corners: [points[0], points[1]],
                color,
            },
            PrimitiveKind::Polygon => Primitive::Polygon { points, color },
        })
    }

    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Primitive::Line { .. } => PrimitiveKind::Line,
            Primitive::Triangle { .. } => PrimitiveKind::Triangle,
            Primitive::Rectangle { .. } => PrimitiveKind::Rectangle,
            Primitive::Polygon { .. } => PrimitiveKind::Polygon,
        }
    }

    pub fn color(&self) -> Rgba {
        match self {
            Primitive::Line { color, .. }
            | Primitive::Triangle { color, .. }
            | Primitive::Rectangle { color, .. }
            | Primitive::Polygon { color, .. } => *color,
        }
    }

    /// Точки в том виде, в каком их ввели
    pub fn points(&self) -> &[Point3] {
        match self {
            Primitive::Line { points, .. } => points,
            Primitive::Triangle { points, .. } => points,
            Primitive::Rectangle { corners, .. } => corners,
            Primitive::Polygon { points, .. } => points,
        }
    }

    /// Вершины для отрисовки; прямоугольник раскрывается в четыре угла
    pub fn vertices(&self) -> Vec<Point3> {
        match self {
            Primitive::Rectangle { corners, .. } => rectangle_quad(corners[0], corners[1]).to_vec(),
            _ => self.points().to_vec(),
        }
    }
}

/// Углы прямоугольника, натянутого на `a` и `b`, против часовой стрелки
pub fn rectangle_quad(a: Point3, b: Point3) -> [Point3; 4] {
    let z = a[2];
    [[a[0], a[1], z], [b[0], a[1], z], [b[0], b[1], z], [a[0], b[1], z]]
}

/// Точечный источник света
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightSource {
    pub position: Point3,
}

/// Сколько пользовательских источников участвуют в освещении (кроме источника по умолчанию)
pub const MAX_EFFECTIVE_LIGHTS: usize = 7;

// ── Camera ───────────────────────────────────────────────────

/// Орбитальная камера: расстояние вдоль оси взгляда и углы поворота в градусах
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub distance: f32,
    pub rotation_x: f32,
    pub rotation_y: f32,
}

impl Camera {
    pub const MIN_DISTANCE: f32 = -20.0;
    pub const MAX_DISTANCE: f32 = -1.0;
    pub const DEFAULT_DISTANCE: f32 = -5.0;

    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance + delta).clamp(Self::MIN_DISTANCE, Self::MAX_DISTANCE);
    }

    pub fn rotate(&mut self, d_yaw: f32, d_pitch: f32) {
        self.rotation_y += d_yaw;
        self.rotation_x += d_pitch;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            distance: Self::DEFAULT_DISTANCE,
            rotation_x: 0.0,
            rotation_y: 0.0,
        }
    }
}

// ── Render settings ──────────────────────────────────────────

/// Режим отрисовки полигонов
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillMode {
    #[default]
    Fill,
    Wireframe,
    Point,
}

impl FillMode {
    pub fn next(self) -> Self {
        match self {
            FillMode::Fill => FillMode::Wireframe,
            FillMode::Wireframe => FillMode::Point,
            FillMode::Point => FillMode::Fill,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FillMode::Fill => "fill",
            FillMode::Wireframe => "wireframe",
            FillMode::Point => "point",
        }
    }
}

/// Битовый шаблон и множитель для штриховых и пунктирных линий
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stipple {
    pub factor: u8,
    pub pattern: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl LineStyle {
    pub fn stipple(self) -> Stipple {
        let pattern = match self {
            LineStyle::Solid => 0xFFFF,
            LineStyle::Dashed => 0x00FF,
            LineStyle::Dotted => 0x0101,
        };
        Stipple { factor: 1, pattern }
    }

    pub fn name(self) -> &'static str {
        match self {
            LineStyle::Solid => "solid",
            LineStyle::Dashed => "dashed",
            LineStyle::Dotted => "dotted",
        }
    }

    pub fn all() -> &'static [LineStyle] {
        &[LineStyle::Solid, LineStyle::Dashed, LineStyle::Dotted]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderSettings {
    pub fill_mode: FillMode,
    pub line_width: f32,
    pub line_style: LineStyle,
    pub lighting_enabled: bool,
}

impl RenderSettings {
    pub const MIN_LINE_WIDTH: f32 = 0.5;
    pub const MAX_LINE_WIDTH: f32 = 10.0;
    pub const LINE_WIDTH_STEP: f32 = 0.5;

    pub fn adjust_line_width(&mut self, delta: f32) {
        self.line_width =
            (self.line_width + delta).clamp(Self::MIN_LINE_WIDTH, Self::MAX_LINE_WIDTH);
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            fill_mode: FillMode::Fill,
            line_width: 1.0,
            line_style: LineStyle::Solid,
            lighting_enabled: true,
        }
    }
}

// ── Colors ───────────────────────────────────────────────────

/// Какой цвет меняет выбор на палитре
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorTarget {
    #[default]
    Background,
    AccentObject,
    Primitive,
}

impl ColorTarget {
    pub fn name(self) -> &'static str {
        match self {
            ColorTarget::Background => "background",
            ColorTarget::AccentObject => "accent object",
            ColorTarget::Primitive => "primitive",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorTargets {
    pub background: Rgba,
    /// Цвет опорного объекта
    pub accent_object: Rgba,
    /// Цвет для новых примитивов
    pub active_primitive: Rgba,
}

impl ColorTargets {
    pub fn get(&self, target: ColorTarget) -> Rgba {
        match target {
            ColorTarget::Background => self.background,
            ColorTarget::AccentObject => self.accent_object,
            ColorTarget::Primitive => self.active_primitive,
        }
    }

    pub fn set(&mut self, target: ColorTarget, color: Rgba) {
        match target {
            ColorTarget::Background => self.background = color,
            ColorTarget::AccentObject => self.accent_object = color,
            ColorTarget::Primitive => self.active_primitive = color,
        }
    }
}

impl Default for ColorTargets {
    fn default() -> Self {
        Self {
            background: [0.08, 0.08, 0.1, 1.0],
            accent_object: [1.0, 1.0, 1.0, 1.0],
            active_primitive: [1.0, 0.8, 0.2, 1.0],
        }
    }
}
