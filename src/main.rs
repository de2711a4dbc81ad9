//! Pixel Platformer entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlInputElement, KeyboardEvent};

    use pixel_platformer::consts::*;
    use pixel_platformer::settings::{SPEED_MAX, SPEED_MIN, SPEED_STEP};
    use pixel_platformer::sim::{Facing, ObstacleKind};
    use pixel_platformer::{FrameHandle, FrameSource, GameLoop, LevelData, Settings};

    /// `requestAnimationFrame` backed frame source
    #[derive(Default)]
    struct AnimationFrames {
        callback: Option<Closure<dyn FnMut(f64)>>,
    }

    impl FrameSource for AnimationFrames {
        fn request_frame(&mut self) -> FrameHandle {
            let (Some(window), Some(callback)) = (web_sys::window(), self.callback.as_ref()) else {
                log::error!("No window to schedule frames on");
                return FrameHandle(0);
            };
            let id = window
                .request_animation_frame(callback.as_ref().unchecked_ref())
                .unwrap_or(0);
            FrameHandle(id as u64)
        }

        fn cancel_frame(&mut self, handle: FrameHandle) {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(handle.0 as i32);
            }
        }
    }

    /// Game instance holding all state
    struct Game {
        game_loop: GameLoop<AnimationFrames>,
        ctx: CanvasRenderingContext2d,
    }

    impl Game {
        fn render(&self) {
            let view = self.game_loop.view();
            let ctx = &self.ctx;

            ctx.set_fill_style_str("#38bdf8");
            ctx.fill_rect(0.0, 0.0, GAME_WIDTH as f64, GAME_HEIGHT as f64);

            // World is y-up from the level floor; canvas is y-down
            let to_screen = |x: f32, y: f32, h: f32| {
                ((x - view.camera_x) as f64, (GAME_HEIGHT - y - h) as f64)
            };

            for obstacle in view.obstacles {
                ctx.set_fill_style_str(match obstacle.kind {
                    ObstacleKind::Platform => "#a16207",
                    ObstacleKind::Hazard => "#dc2626",
                    ObstacleKind::Finish => "#22c55e",
                });
                let (sx, sy) = to_screen(obstacle.pos.x, obstacle.pos.y, obstacle.size.y);
                ctx.fill_rect(sx, sy, obstacle.size.x as f64, obstacle.size.y as f64);
            }

            // Actor squashes while standing and stretches while rising
            let body_h = if view.airborne { PLAYER_HEIGHT - 2.0 } else { PLAYER_HEIGHT - 6.0 };
            let (sx, sy) = to_screen(view.actor_pos.x, view.actor_pos.y, body_h);
            ctx.set_fill_style_str("#60a5fa");
            ctx.fill_rect(sx + 3.0, sy, (PLAYER_WIDTH - 6.0) as f64, body_h as f64);

            let eye_dx = match view.facing {
                Facing::Left => -1.0,
                Facing::Right => 1.0,
            };
            ctx.set_fill_style_str("#ffffff");
            for eye_x in [PLAYER_WIDTH / 2.0 - 4.0, PLAYER_WIDTH / 2.0 + 4.0] {
                ctx.fill_rect(sx + eye_x as f64 + eye_dx - 1.0, sy + 6.0, 2.0, 2.0);
            }
        }

        fn update_overlay(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let view = self.game_loop.view();

            if let Some(el) = document.get_element_by_id("overlay") {
                let class = if view.overlay.is_some() { "" } else { "hidden" };
                let _ = el.set_attribute("class", class);
            }
            if let Some(overlay) = view.overlay {
                if let Some(el) = document.get_element_by_id("overlay-message") {
                    el.set_text_content(Some(overlay.message));
                }
                if let Some(el) = document.get_element_by_id("overlay-button") {
                    el.set_text_content(Some(overlay.button));
                }
            }
        }

        fn paint(&self) {
            self.render();
            self.update_overlay();
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Pixel Platformer starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        canvas.set_width(GAME_WIDTH as u32);
        canvas.set_height(GAME_HEIGHT as u32);
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into()?;

        let game = Rc::new(RefCell::new(Game {
            game_loop: GameLoop::new(
                LevelData::default_level(),
                Settings::load(),
                AnimationFrames::default(),
            ),
            ctx,
        }));

        // The frame callback only holds a weak handle so teardown can drop the game
        let weak = Rc::downgrade(&game);
        let callback = Closure::<dyn FnMut(f64)>::new(move |time: f64| {
            let Some(game) = weak.upgrade() else {
                return;
            };
            let mut g = game.borrow_mut();
            if let Some(handle) = g.game_loop.pending() {
                g.game_loop.on_frame(handle, time);
            }
            g.paint();
        });
        game.borrow_mut().game_loop.frames_mut().callback = Some(callback);

        setup_keyboard(game.clone())?;
        setup_overlay_button(game.clone(), &document)?;
        setup_speed_slider(game.clone(), &document)?;

        game.borrow().paint();
        log::info!("Pixel Platformer ready");

        // Page lifetime
        std::mem::forget(game);
        Ok(())
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        for (event_name, is_down) in [("keydown", true), ("keyup", false)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if game.borrow_mut().game_loop.on_key_event(&event.key(), is_down) {
                    event.prevent_default();
                }
            });
            window.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Keys held while the tab loses focus would otherwise stay latched
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().game_loop.input_mut().clear();
        });
        window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_overlay_button(game: Rc<RefCell<Game>>, document: &web_sys::Document) -> Result<(), JsValue> {
        let Some(btn) = document.get_element_by_id("overlay-button") else {
            log::warn!("No overlay button; game cannot be started");
            return Ok(());
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            let mut g = game.borrow_mut();
            let overlay = g.game_loop.view().overlay;
            if let Some(overlay) = overlay {
                g.game_loop.command(overlay.command);
            }
            g.paint();
        });
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_speed_slider(game: Rc<RefCell<Game>>, document: &web_sys::Document) -> Result<(), JsValue> {
        let Some(slider) = document.get_element_by_id("speed-control") else {
            return Ok(());
        };
        let slider: HtmlInputElement = slider.dyn_into()?;
        slider.set_min(&SPEED_MIN.to_string());
        slider.set_max(&SPEED_MAX.to_string());
        slider.set_step(&SPEED_STEP.to_string());
        slider.set_value(&game.borrow().game_loop.settings().speed_multiplier().to_string());
        set_speed_label(document, &game.borrow().game_loop.settings().speed_label());

        let input = slider.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Ok(value) = input.value().parse::<f32>() else {
                return;
            };
            let mut g = game.borrow_mut();
            g.game_loop.set_speed_multiplier(value);
            g.game_loop.settings().save();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                set_speed_label(&document, &g.game_loop.settings().speed_label());
            }
        });
        slider.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn set_speed_label(document: &web_sys::Document, label: &str) {
        if let Some(el) = document.get_element_by_id("speed-label") {
            el.set_text_content(Some(label));
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Pixel Platformer (native) starting...");
    log::info!("Native mode runs a headless autopilot - build for wasm32 to play");

    if let Err(e) = native::run(std::env::args().skip(1).collect()) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use pixel_platformer::consts::FRAME_MS;
    use pixel_platformer::level::LevelError;
    use pixel_platformer::settings::SettingsError;
    use pixel_platformer::view::{LogPresenter, Presenter};
    use pixel_platformer::{GameLoop, LevelData, ManualFrames, Settings};

    /// Give up after one minute of simulated play
    const MAX_FRAMES: u32 = 60 * 60;

    #[derive(Debug, thiserror::Error)]
    pub enum RunError {
        #[error("level: {0}")]
        Level(#[from] LevelError),
        #[error("settings: {0}")]
        Settings(#[from] SettingsError),
        #[error("usage: pixel-platformer [--level <file.json>] [--settings <file.json>] [--speed <0.5-2.5>]")]
        Usage,
    }

    /// Run the level once with a run-and-jump autopilot
    pub fn run(args: Vec<String>) -> Result<(), RunError> {
        let mut level = LevelData::default_level();
        let mut settings = Settings::default();

        let mut args = args.into_iter();
        while let Some(flag) = args.next() {
            let value = args.next().ok_or(RunError::Usage)?;
            match flag.as_str() {
                "--level" => level = LevelData::load(&value)?,
                "--settings" => settings = Settings::load_from(&value)?,
                "--speed" => settings.set_speed_multiplier(value.parse().map_err(|_| RunError::Usage)?),
                _ => return Err(RunError::Usage),
            }
        }

        let mut game = GameLoop::new(level, settings, ManualFrames::new());
        let mut presenter = LogPresenter::default();
        presenter.present(&game.view());

        game.start();
        game.on_key_event("ArrowRight", true);

        let mut frame = 0;
        while frame < MAX_FRAMES {
            // Tap jump every half second
            game.on_key_event(" ", frame % 30 == 0);
            if !game.pump(frame as f64 * FRAME_MS) {
                break;
            }
            presenter.present(&game.view());
            frame += 1;
        }

        game.shutdown();
        let actor = game.session().actor();
        log::info!(
            "Finished as {} after {} ticks at ({:.1}, {:.1})",
            game.session().status().as_str(),
            game.session().ticks(),
            actor.pos.x,
            actor.pos.y
        );
        Ok(())
    }
}
