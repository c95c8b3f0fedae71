//! Boucle d'événements Winit et cycle de vie de la fenêtre unique.
//!
//! ## Pattern "Two-Phase App"
//!
//! Winit 0.30 impose que les fenêtres soient créées à l'intérieur du callback
//! `resumed()`, et non dans `main()`. Le moteur et la fenêtre naissent donc
//! dans `resumed()` :
//!
//! ```text
//! Initial(Pending)  →  [resumed()]  →  Running(Rc<ShellState>)  →  [exiting()]  →  Stopped
//! ```
//!
//! ## Ordre des appels
//!
//! `resumed()` enchaîne Initialize (Servo) puis CreateWindow (fenêtre,
//! contexte GL, webview) puis RunLoop. `exiting()` fait le Shutdown :
//! la webview est fermée avant que le moteur ne soit libéré. Les transitions
//! elles-mêmes vivent dans [`crate::session`].

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use euclid::Scale;
use servo::{InputEvent, WheelDelta, WheelEvent, WheelMode};
use servo::{MouseButton as ServoMouseButton, MouseButtonAction, MouseButtonEvent};
use servo::{MouseLeftViewportEvent, MouseMoveEvent};
use servo::{RenderingContext, Servo, ServoBuilder, WebView, WebViewBuilder, WindowRenderingContext};
use tracing::{debug, info, warn};
use url::Url;
use webrender_api::units::DevicePoint;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use winit::window::{Window, WindowId};

use crate::config::Config;
use crate::error::{Result, ShellError};
use crate::lifecycle::{Phase, Step};
use crate::preferences;
use crate::rendering;
use crate::servo_glue::{Waker, WakerEvent};
use crate::session::{Session, Teardown};

/// Hauteur d'une "ligne" de défilement, en pixels.
const LINE_HEIGHT: f32 = 76.0;

// ─────────────────────────────────────────────────────────────────────────────
// ShellState : état partagé entre Winit et Servo
// ─────────────────────────────────────────────────────────────────────────────

/// État de la coquille une fois la fenêtre ouverte.
///
/// Encapsulé dans `Rc` car `WebViewBuilder::delegate` attend un
/// `Rc<dyn WebViewDelegate>` ; tout vit sur le thread principal.
pub struct ShellState {
    pub window: Window,

    pub servo: Servo,

    /// Contexte OpenGL de la fenêtre, dans lequel Servo peint.
    pub rendering_context: Rc<WindowRenderingContext>,

    /// L'unique webview. `None` une fois le navigateur fermé.
    pub webview: RefCell<Option<WebView>>,

    /// Position courante du curseur en device pixels.
    pub cursor_position: Cell<DevicePoint>,

    /// Titre de base de la fenêtre (configuration).
    pub app_title: String,
}

impl ShellState {
    fn with_webview(&self, f: impl FnOnce(&WebView)) {
        if let Some(webview) = self.webview.borrow().as_ref() {
            f(webview);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// App
// ─────────────────────────────────────────────────────────────────────────────

/// Ce dont `resumed()` a besoin pour démarrer le navigateur.
pub struct Pending {
    waker: Waker,
    config: Config,
    url: Url,
}

/// Démontage : la webview d'abord (casse aussi le cycle webview →
/// delegate), puis un tour de boucle Servo, puis le moteur.
impl Teardown for Rc<ShellState> {
    fn close_browser(&self) {
        let webview = self.webview.borrow_mut().take();
        drop(webview);
        self.servo.spin_event_loop();
    }

    fn release_engine(self) {
        match Rc::try_unwrap(self) {
            Ok(state) => drop(state),
            Err(state) => warn!(
                refs = Rc::strong_count(&state),
                "État encore référencé au shutdown, libération différée"
            ),
        }
    }
}

pub struct App {
    session: Session<Pending, Rc<ShellState>>,
}

impl App {
    pub fn new(event_loop: &EventLoop<WakerEvent>, config: Config, url: Url) -> Self {
        Self {
            session: Session::new(Pending {
                waker: Waker::new(event_loop),
                config,
                url,
            }),
        }
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    /// Résultat final : l'erreur de démarrage, s'il y en a eu une.
    pub fn into_result(self) -> Result<()> {
        self.session.into_result()
    }

    /// Initialize → CreateWindow → RunLoop.
    fn start(
        &mut self,
        event_loop: &ActiveEventLoop,
        waker: Waker,
        config: &Config,
        url: Url,
    ) -> Result<Rc<ShellState>> {
        // ── 1. Initialize : instance Servo ────────────────────────────────
        self.session.advance(Step::Initialize)?;
        let servo = ServoBuilder::default()
            .preferences(preferences::build_servo_preferences(&config.servo))
            .event_loop_waker(Box::new(waker))
            .build();

        // ── 2. CreateWindow : fenêtre, contexte GL, webview ───────────────
        let display_handle = event_loop
            .display_handle()
            .map_err(ShellError::DisplayHandle)?;

        let window_attributes = Window::default_attributes()
            .with_title(config.general.window_title.as_str())
            .with_inner_size(winit::dpi::LogicalSize::new(
                config.window.width as f64,
                config.window.height as f64,
            ));

        let window = event_loop.create_window(window_attributes)?;

        let window_handle = window.window_handle().map_err(ShellError::WindowHandle)?;

        let rendering_context =
            rendering::create_rendering_context(display_handle, window_handle, window.inner_size())?;

        let state = Rc::new(ShellState {
            window,
            servo,
            rendering_context,
            webview: RefCell::new(None),
            cursor_position: Cell::new(DevicePoint::zero()),
            app_title: config.general.window_title.clone(),
        });

        let scale_factor = state.window.scale_factor() as f32;
        let webview = WebViewBuilder::new(
            &state.servo,
            state.rendering_context.clone() as Rc<dyn RenderingContext>,
        )
        .url(url.clone())
        .hidpi_scale_factor(Scale::new(scale_factor))
        .delegate(state.clone())
        .build();

        *state.webview.borrow_mut() = Some(webview);
        self.session.advance(Step::CreateWindow)?;
        info!(%url, "Fenêtre ouverte");

        // ── 3. RunLoop : la main passe à la boucle Winit ──────────────────
        self.session.advance(Step::RunLoop)?;
        Ok(state)
    }
}

fn to_servo_button(button: WinitMouseButton) -> ServoMouseButton {
    match button {
        WinitMouseButton::Left => ServoMouseButton::Left,
        WinitMouseButton::Right => ServoMouseButton::Right,
        WinitMouseButton::Middle => ServoMouseButton::Middle,
        WinitMouseButton::Back => ServoMouseButton::Back,
        WinitMouseButton::Forward => ServoMouseButton::Forward,
        WinitMouseButton::Other(id) => ServoMouseButton::Other(id),
    }
}

/// Convertit un delta Winit en delta Servo ; les lignes sont converties en
/// pixels approximatifs.
fn wheel_delta(delta: MouseScrollDelta) -> WheelDelta {
    let (x, y, mode) = match delta {
        MouseScrollDelta::LineDelta(dx, dy) => (
            (dx * LINE_HEIGHT) as f64,
            (dy * LINE_HEIGHT) as f64,
            WheelMode::DeltaLine,
        ),
        MouseScrollDelta::PixelDelta(delta) => (delta.x, delta.y, WheelMode::DeltaPixel),
    };
    WheelDelta { x, y, z: 0.0, mode }
}

// ─────────────────────────────────────────────────────────────────────────────
// ApplicationHandler : dispatch des événements Winit
// ─────────────────────────────────────────────────────────────────────────────

impl ApplicationHandler<WakerEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(pending) = self.session.pending() else {
            return;
        };
        let (waker, config, url) = (
            pending.waker.clone(),
            pending.config.clone(),
            pending.url.clone(),
        );

        match self.start(event_loop, waker, &config, url) {
            Ok(state) => self.session.enter_running(state),
            Err(e) => {
                self.session.fail(e);
                event_loop.exit();
            }
        }
    }

    /// Un `WakerEvent` arrive depuis les threads Servo.
    fn user_event(&mut self, _event_loop: &ActiveEventLoop, _event: WakerEvent) {
        if let Some(state) = self.session.running() {
            state.servo.spin_event_loop();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(state) = self.session.running() else {
            return;
        };

        // Toujours faire tourner la boucle Servo en premier.
        state.servo.spin_event_loop();

        match event {
            WindowEvent::CloseRequested => {
                info!("Fermeture demandée");
                event_loop.exit();
            }

            WindowEvent::RedrawRequested => {
                state.with_webview(|webview| {
                    webview.paint();
                });
                state.rendering_context.present();
            }

            WindowEvent::Resized(new_size) => {
                debug!(width = new_size.width, height = new_size.height, "Redimensionnement");
                state.rendering_context.resize(new_size);
                state.with_webview(|webview| {
                    webview.resize(new_size);
                });
            }

            WindowEvent::CursorMoved { position, .. } => {
                let point = DevicePoint::new(position.x as f32, position.y as f32);
                state.cursor_position.set(point);
                state.with_webview(|webview| {
                    webview.notify_input_event(InputEvent::MouseMove(MouseMoveEvent::new(
                        point.into(),
                    )));
                });
            }

            WindowEvent::CursorLeft { .. } => {
                state.with_webview(|webview| {
                    webview.notify_input_event(InputEvent::MouseLeftViewport(
                        MouseLeftViewportEvent::default(),
                    ));
                });
            }

            WindowEvent::MouseInput {
                state: btn_state,
                button,
                ..
            } => {
                let point = state.cursor_position.get();
                let action = match btn_state {
                    ElementState::Pressed => MouseButtonAction::Down,
                    ElementState::Released => MouseButtonAction::Up,
                };
                state.with_webview(|webview| {
                    webview.notify_input_event(InputEvent::MouseButton(MouseButtonEvent::new(
                        action,
                        to_servo_button(button),
                        point.into(),
                    )));
                });
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let point = state.cursor_position.get();
                state.with_webview(|webview| {
                    webview.notify_input_event(InputEvent::Wheel(WheelEvent::new(
                        wheel_delta(delta),
                        point.into(),
                    )));
                });
            }

            _ => (),
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.session.shutdown();
        info!("Moteur libéré");
    }
}
