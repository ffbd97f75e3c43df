use eia_shared::DocumentHead;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlLinkElement, HtmlScriptElement};

pub(crate) fn js_err(value: JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

/// `<head>` of the live document.
pub struct DomHead {
    document: Document,
}

impl DomHead {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn append(&self, element: &web_sys::Element) -> Result<(), String> {
        let head = self
            .document
            .head()
            .ok_or_else(|| "document has no <head>".to_string())?;
        head.append_child(element).map_err(js_err)?;
        Ok(())
    }
}

impl DocumentHead for DomHead {
    fn append_script(&mut self, url: &str) -> Result<(), String> {
        let script = self
            .document
            .create_element("script")
            .map_err(js_err)?
            .dyn_into::<HtmlScriptElement>()
            .map_err(|_| "created element is not a <script>".to_string())?;
        script.set_type("text/javascript");
        script.set_src(url);
        self.append(&script)
    }

    fn append_stylesheet(&mut self, url: &str) -> Result<(), String> {
        let link = self
            .document
            .create_element("link")
            .map_err(js_err)?
            .dyn_into::<HtmlLinkElement>()
            .map_err(|_| "created element is not a <link>".to_string())?;
        link.set_rel("stylesheet");
        link.set_href(url);
        self.append(&link)
    }
}
