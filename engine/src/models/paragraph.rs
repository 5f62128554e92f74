// A paragraph seen as an ordered sequence of styled runs.

/// What the reconciler needs from a paragraph: indexed access to its runs' text and highlight.
///
/// The paragraph's visible text is the concatenation of its runs, in order. Implementations must
/// keep run identity stable: writing text or highlight never adds, removes or reorders runs.
pub trait RunSequence {
    fn run_count(&self) -> usize;

    fn run_text(&self, index: usize) -> String;

    fn set_run_text(&mut self, index: usize, text: &str);

    fn is_highlighted(&self, index: usize) -> bool;

    fn highlight_run(&mut self, index: usize);

    fn text(&self) -> String {
        (0..self.run_count()).map(|i| self.run_text(i)).collect()
    }
}
