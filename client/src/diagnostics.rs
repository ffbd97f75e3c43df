/// Console output for one map. Debug lines only show with `debug: true`.
#[derive(Debug, Clone, Copy)]
pub struct Diagnostics {
    debug: bool,
}

impl Diagnostics {
    pub fn new(debug: bool) -> Self {
        Self { debug }
    }

    pub fn debug(&self, message: &str) {
        if self.debug {
            web_sys::console::debug_1(&message.into());
        }
    }

    pub fn warn(&self, message: &str) {
        web_sys::console::warn_1(&message.into());
    }

    pub fn error(&self, message: &str) {
        web_sys::console::error_1(&message.into());
    }
}
