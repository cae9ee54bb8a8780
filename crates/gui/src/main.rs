mod app;
mod viewport;

use scene_editor_lib::i18n;
use scene_editor_lib::state::EditorSettings;

use app::EditorApp;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scene_editor=info,scene_editor_lib=info".into()),
        )
        .init();

    let settings = EditorSettings::load();
    i18n::set_lang(settings.ui.language);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(settings.window.title.clone())
            .with_inner_size([settings.window.width, settings.window.height])
            .with_resizable(false),
        depth_buffer: 24,
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "scene-editor",
        native_options,
        Box::new(move |cc| Ok(Box::new(EditorApp::new(cc, settings)))),
    ) {
        tracing::error!("Failed to start application: {e}");
    }
}
