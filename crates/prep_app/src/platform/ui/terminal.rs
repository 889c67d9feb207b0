use std::io::{self, Write};

use prep_core::{AppViewModel, Phase, RequestId};

use super::constants::INPUT_PROMPT;
use super::markdown::MarkdownRenderer;
use super::render::render_frame;

const CLEAR_AND_HOME: &str = "\x1b[2J\x1b[H";

/// Writes frames to the terminal.
///
/// A live view repaints the whole screen on every draw. Otherwise only
/// settled frames (`Done`/`Failed`) are written, once per request.
pub struct TerminalView<W: Write> {
    renderer: MarkdownRenderer,
    out: W,
    live: bool,
    prompt: bool,
    /// Request whose settled frame was already written.
    written_request: Option<RequestId>,
}

impl<W: Write> TerminalView<W> {
    pub fn new(renderer: MarkdownRenderer, out: W, live: bool, prompt: bool) -> Self {
        Self {
            renderer,
            out,
            live,
            prompt,
            written_request: None,
        }
    }

    pub fn draw(&mut self, view: &AppViewModel) -> io::Result<()> {
        let frame = render_frame(view, &self.renderer);
        if self.live {
            write!(self.out, "{CLEAR_AND_HOME}{frame}\n\n")?;
            if self.prompt {
                write!(self.out, "{INPUT_PROMPT}")?;
            }
            return self.out.flush();
        }

        if !is_settled(view.phase) || self.written_request == view.request_id {
            return Ok(());
        }
        self.written_request = view.request_id;
        writeln!(self.out, "{frame}")?;
        self.out.flush()
    }

    /// Last write before exit.
    pub fn finish(&mut self, view: &AppViewModel) -> io::Result<()> {
        if self.live {
            self.prompt = false;
            return self.draw(view);
        }
        if is_settled(view.phase) {
            return self.draw(view);
        }
        Ok(())
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

fn is_settled(phase: Phase) -> bool {
    matches!(phase, Phase::Done | Phase::Failed)
}
