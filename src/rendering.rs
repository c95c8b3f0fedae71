//! Factory pour le contexte de rendu GPU.
//!
//! Isole la création du `WindowRenderingContext` (surfman/OpenGL) du reste
//! de la coquille. Servo peint directement dans la surface de la fenêtre.

use std::rc::Rc;

use servo::{RenderingContext, WindowRenderingContext};
use winit::dpi::PhysicalSize;
use winit::raw_window_handle::{DisplayHandle, WindowHandle};

use crate::error::{Result, ShellError};

/// Crée un contexte de rendu lié à la fenêtre Winit et le rend courant,
/// ce qui est requis avant de le passer à `WebViewBuilder`.
pub fn create_rendering_context(
    display_handle: DisplayHandle<'_>,
    window_handle: WindowHandle<'_>,
    size: PhysicalSize<u32>,
) -> Result<Rc<WindowRenderingContext>> {
    let rendering_context = WindowRenderingContext::new(display_handle, window_handle, size)
        .map_err(|e| ShellError::Rendering(format!("{e:?} — vérifiez vos drivers GPU")))?;

    rendering_context
        .make_current()
        .map_err(|e| ShellError::Rendering(format!("make_current: {e:?}")))?;

    Ok(Rc::new(rendering_context))
}
