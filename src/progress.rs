// src/progress.rs
/// Lightweight progress reporting used by long-running operations (scrape/clean).
/// Frontends implement this to surface status to users.
pub trait Progress {
    /// Called at the start of one unit of work (e.g. one site).
    fn begin(&mut self, _label: &str) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called when a page has been committed, with the number of reviews it added.
    fn page_done(&mut self, _page: u32, _reviews: usize) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}

/// Plain stdout lines, one per page.
#[derive(Default)]
pub struct ConsoleProgress {
    label: String,
    pages: u32,
    total: usize,
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, label: &str) {
        self.label = s!(label);
        self.pages = 0;
        self.total = 0;
        println!("{label}: starting");
    }

    fn log(&mut self, msg: &str) {
        println!("{msg}");
    }

    fn page_done(&mut self, page: u32, reviews: usize) {
        self.pages += 1;
        self.total += reviews;
        println!("{}: page {page} done, {reviews} reviews ({} total)", self.label, self.total);
    }

    fn finish(&mut self) {
        if self.pages > 0 {
            println!("{}: finished with {} reviews", self.label, self.total);
        }
    }
}
