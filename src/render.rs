//! Expression → markup conversion.
//!
//! [`convert_expression`] is the only entry point the rest of the crate uses.
//! It turns whatever the renderer does (succeed, fail, panic) into a markup
//! string, so a bad expression in one step never reaches the caller as an
//! error.

use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

use pulldown_latex::{
    config::DisplayMode, config::RenderConfig, mathml::push_mathml, Parser, Storage,
};
use thiserror::Error;

/// Markup shown in place of an expression the renderer rejected.
pub const INVALID_EXPRESSION_MARKUP: &str =
    r#"<span class="math-error" style="color:red;">Invalid expression</span>"#;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("render failed: {0}")]
pub struct RenderError(pub String);

/// External expression renderer.
///
/// Implementations are expected to be lenient, but may still reject input.
pub trait ExpressionRenderer {
    fn render(&self, expression: &str) -> Result<String, RenderError>;
}

/// Convert expression text to markup.
///
/// Blank input yields empty markup. Renderer failures (including panics)
/// yield [`INVALID_EXPRESSION_MARKUP`].
pub fn convert_expression<R: ExpressionRenderer + ?Sized>(renderer: &R, expression: &str) -> String {
    if expression.trim().is_empty() {
        return String::new();
    }

    match render_quietly(renderer, expression) {
        Ok(Ok(markup)) => markup,
        Ok(Err(e)) => {
            tracing::debug!(error = %e, "expression rejected by renderer");
            INVALID_EXPRESSION_MARKUP.to_string()
        }
        Err(_) => INVALID_EXPRESSION_MARKUP.to_string(),
    }
}

thread_local! {
    static QUIET_PANICS: Cell<bool> = const { Cell::new(false) };
}

static QUIET_HOOK: Once = Once::new();

/// Wrap the process panic hook once so that panics raised inside
/// [`render_quietly`] go to the log instead of stderr, which the TUI owns.
fn install_quiet_hook() {
    QUIET_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if QUIET_PANICS.with(Cell::get) {
                tracing::warn!(%info, "expression renderer panicked");
            } else {
                previous(info);
            }
        }));
    });
}

fn render_quietly<R: ExpressionRenderer + ?Sized>(
    renderer: &R,
    expression: &str,
) -> std::thread::Result<Result<String, RenderError>> {
    install_quiet_hook();
    QUIET_PANICS.with(|q| q.set(true));
    let result = panic::catch_unwind(AssertUnwindSafe(|| renderer.render(expression)));
    QUIET_PANICS.with(|q| q.set(false));
    result
}

/// Inline MathML via pulldown-latex.
#[derive(Debug, Clone, Copy, Default)]
pub struct MathMlRenderer {
    pub display_mode: bool,
}

impl ExpressionRenderer for MathMlRenderer {
    fn render(&self, expression: &str) -> Result<String, RenderError> {
        let storage = Storage::new();
        let parser = Parser::new(expression, &storage);
        let config = RenderConfig {
            display_mode: if self.display_mode {
                DisplayMode::Block
            } else {
                DisplayMode::Inline
            },
            ..Default::default()
        };

        let events: Vec<_> = parser.collect();
        let errors: Vec<String> = events
            .iter()
            .filter_map(|e| e.as_ref().err().map(|err| err.to_string()))
            .collect();
        if !errors.is_empty() {
            return Err(RenderError(errors.join("; ")));
        }

        let mut mathml = String::new();
        push_mathml(&mut mathml, events.into_iter(), config)
            .map_err(|e| RenderError(e.to_string()))?;
        Ok(mathml)
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use super::*;

    struct Panicking;

    impl ExpressionRenderer for Panicking {
        fn render(&self, _expression: &str) -> Result<String, RenderError> {
            panic!("renderer bug");
        }
    }

    #[test]
    fn blank_input_is_empty_markup() {
        let r = MathMlRenderer::default();
        assert_eq!(convert_expression(&r, ""), "");
        assert_eq!(convert_expression(&r, "   \t"), "");
    }

    #[test]
    fn renders_polynomial_to_mathml() {
        let markup = convert_expression(&MathMlRenderer::default(), "x^2+1");
        assert!(markup.contains("<math"));
        assert!(markup.contains("</math>"));
        assert_ne!(markup, INVALID_EXPRESSION_MARKUP);
    }

    #[test]
    fn renders_fraction() {
        let markup = convert_expression(&MathMlRenderer::default(), r"\frac{a}{b}");
        assert!(markup.contains("<mfrac"));
    }

    #[test]
    fn unterminated_fraction_is_error_marker() {
        let markup = convert_expression(&MathMlRenderer::default(), r"\frac{a");
        assert_eq!(markup, INVALID_EXPRESSION_MARKUP);
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn panic_is_contained_and_logged() {
        let log = LogBuffer::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let markup = tracing::subscriber::with_default(subscriber, || {
            convert_expression(&Panicking, "x")
        });

        assert_eq!(markup, INVALID_EXPRESSION_MARKUP);
        let logged = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
        assert!(logged.contains("expression renderer panicked"));
        assert!(logged.contains("renderer bug"));
        assert!(!QUIET_PANICS.with(Cell::get));
    }
}
