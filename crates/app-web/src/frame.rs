use crate::audio::{AudioEvent, AudioEvents, MusicPlayer};
use crate::constants::MAX_FRAME_DT;
use crate::media::{LoadQueue, MediaElement};
use crate::overlay::Overlay;
use crate::render;
use app_core::{AudioDirector, GestureStore, Phase, Scene};
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext<'a> {
    pub scene: Scene,
    pub store: GestureStore,

    pub director: Rc<RefCell<AudioDirector>>,
    pub player: Rc<MusicPlayer>,
    pub audio_events: AudioEvents,

    pub elements: Rc<Vec<MediaElement>>,
    pub loads: LoadQueue,
    pub overlay: Rc<RefCell<Overlay>>,

    pub canvas: web::HtmlCanvasElement,
    pub gpu: Option<render::GpuState<'a>>,

    pub last_instant: Instant,
}

impl<'a> FrameContext<'a> {
    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt_sec = (now - self.last_instant).as_secs_f32().min(MAX_FRAME_DT);
        self.last_instant = now;

        for (item, state) in self.loads.borrow_mut().drain(..) {
            self.scene.gallery.set_load_state(item, state);
        }

        let report = self.scene.tick(&self.store, dt_sec);

        for (el, item) in self.elements.iter().zip(&self.scene.gallery.items) {
            el.apply_gate(item.audio);
        }
        for ev in report.proximity {
            let cmds = self.director.borrow_mut().on_proximity(ev);
            self.player.execute(&cmds);
        }
        self.drain_audio_events();

        {
            let mut overlay = self.overlay.borrow_mut();
            overlay.set_pose(report.gesture.pose);
            let director = self.director.borrow();
            if director.phase() == Phase::World {
                overlay.set_track_label(director.now_playing_label());
            }
        }

        if let Some(gpu) = self.gpu.as_mut() {
            gpu.resize_if_needed(self.canvas.width(), self.canvas.height());
            let camera = self.scene.rig.camera(gpu.aspect());
            match gpu.render(&camera, &self.scene, &self.elements) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => gpu.reconfigure(),
                Err(e) => log::warn!("[scene] frame skipped: {:?}", e),
            }
        }
    }

    fn drain_audio_events(&mut self) {
        loop {
            let Some(ev) = self.audio_events.borrow_mut().pop_front() else {
                break;
            };
            let cmds = match ev {
                AudioEvent::TrackEnded => self.director.borrow_mut().track_ended(),
                AudioEvent::Rejected(channel) => {
                    self.director.borrow_mut().playback_rejected(channel);
                    continue;
                }
            };
            self.player.execute(&cmds);
        }
    }
}

pub async fn init_gpu(
    canvas: &web::HtmlCanvasElement,
    scene: &Scene,
) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(
        leaked_canvas,
        scene.particles.instance_count(),
        scene.gallery.len(),
    )
    .await
    {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

/// Drive `frame()` from requestAnimationFrame until `running` is cleared.
pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>, running: Rc<Cell<bool>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        if !running.get() {
            log::info!("[scene] render loop stopped");
            return;
        }
        frame_ctx.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
