//! Main application module

mod input_map;

use std::sync::{Arc, Mutex};

use eframe::egui;
use scene_editor_lib::frame::{run_paced_frame, FrameOutcome, FramePacer};
use scene_editor_lib::render::{CommandRecorder, GfxCommand, RenderPipeline};
use scene_editor_lib::state::{EditorSettings, EditorState};

use crate::viewport::{GlBackend, GlyphRasterizer};

/// Main application: owns the editor runtime and hands each recorded frame to GL
pub struct EditorApp {
    state: EditorState,
    pipeline: RenderPipeline,
    recorder: CommandRecorder,
    text: GlyphRasterizer,
    pacer: FramePacer,
    /// Most recent rendered frame, painted again while the next one is not due
    last_frame: Arc<Vec<GfxCommand>>,
    backend: Option<Arc<Mutex<GlBackend>>>,
}

impl EditorApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: EditorSettings) -> Self {
        let backend = match cc.gl.as_ref() {
            Some(gl) => match GlBackend::new(gl) {
                Ok(backend) => Some(Arc::new(Mutex::new(backend))),
                Err(e) => {
                    tracing::error!("Failed to initialize GL backend: {e}");
                    None
                }
            },
            None => {
                tracing::error!("No glow context, the scene will not be drawn");
                None
            }
        };

        let pacer = FramePacer::new(settings.frame_budget());
        Self {
            state: EditorState::new(settings),
            pipeline: RenderPipeline::new(),
            recorder: CommandRecorder::new(),
            text: GlyphRasterizer::new(),
            pacer,
            last_frame: Arc::new(Vec::new()),
            backend,
        }
    }
}

impl eframe::App for EditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let events = ctx.input(input_map::collect_events);
        let outcome = run_paced_frame(
            &mut self.state,
            &mut self.pipeline,
            &mut self.pacer,
            events,
            &mut self.recorder,
            &mut self.text,
        );
        match outcome {
            FrameOutcome::Exit => {
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                return;
            }
            FrameOutcome::Rendered => {
                if !self.recorder.is_balanced() {
                    tracing::warn!("Frame left a matrix or attribute stack unbalanced");
                }
                self.last_frame = Arc::new(self.recorder.take());
            }
            FrameOutcome::Waiting => {}
        }
        let commands = Arc::clone(&self.last_frame);

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let Some(backend) = self.backend.clone() else {
                    return;
                };
                let callback = egui::PaintCallback {
                    rect: ui.max_rect(),
                    callback: Arc::new(egui_glow::CallbackFn::new(
                        move |info, painter| {
                            let vp = info.viewport_in_pixels();
                            let viewport = [vp.left_px, vp.from_bottom_px, vp.width_px, vp.height_px];
                            if let Ok(mut backend) = backend.lock() {
                                backend.paint(painter.gl(), viewport, &commands);
                            }
                        },
                    )),
                };
                ui.painter().add(callback);
            });

        ctx.request_repaint_after(self.pacer.remaining());
    }

    fn on_exit(&mut self, gl: Option<&glow::Context>) {
        self.pipeline.shutdown(&mut self.recorder);
        let commands = self.recorder.take();
        if let (Some(gl), Some(backend)) = (gl, self.backend.as_ref()) {
            if let Ok(mut backend) = backend.lock() {
                backend.replay(gl, &commands);
                backend.destroy(gl);
            }
        }
        tracing::info!("Editor closed ({:.1} fps at exit)", self.pacer.fps());
    }
}
