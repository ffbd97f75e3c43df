use eia_shared::PopupContent;
use wasm_bindgen::JsValue;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

pub const MARKER_CLASS: &str = "location-marker";

pub fn popup_class(standard: &str) -> String {
    if standard.is_empty() {
        "location-popup flex flex-col".to_string()
    } else {
        format!("location-popup flex flex-col {standard}")
    }
}

pub fn marker_class(standard: &str) -> String {
    if standard.is_empty() {
        MARKER_CLASS.to_string()
    } else {
        format!("{MARKER_CLASS} {MARKER_CLASS}--{standard}")
    }
}

/// CSS `url()` value for a background image, quoted so any path stays one token.
pub fn css_url(path: &str) -> String {
    let mut out = String::with_capacity(path.len() + 7);
    out.push_str("url(\"");
    for c in path.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\a "),
            '\r' => out.push_str("\\d "),
            _ => out.push(c),
        }
    }
    out.push_str("\")");
    out
}

fn child(
    document: &Document,
    parent: &Element,
    tag: &str,
    class: Option<&str>,
) -> Result<Element, JsValue> {
    let el = document.create_element(tag)?;
    if let Some(class) = class {
        el.set_class_name(class);
    }
    parent.append_child(&el)?;
    Ok(el)
}

/// Build the popup fragment. Text goes in via `textContent`, never as markup.
pub fn render(document: &Document, content: &PopupContent) -> Result<Element, JsValue> {
    let root = document.create_element("div")?;
    root.set_class_name(&popup_class(&content.standard));

    if let Some(image) = &content.image {
        let el: HtmlElement = child(document, &root, "div", Some("location-popup-image"))?.dyn_into()?;
        el.style().set_property("background-image", &css_url(image))?;
    }

    let body = child(document, &root, "div", Some("location-popup-content"))?;

    let tags = child(document, &body, "ul", Some("tags"))?;
    for tag in &content.tags {
        let li = child(document, &tags, "li", Some("tag"))?;
        li.set_attribute("title", tag.label)?;
        let img = child(document, &li, "img", None)?;
        img.set_attribute("src", tag.icon)?;
        img.set_attribute("alt", tag.label)?;
    }

    let badges = child(document, &body, "ul", Some("badges"))?;
    for badge in &content.badges {
        let li = child(document, &badges, "li", Some("badge"))?;
        li.set_text_content(Some(&badge.label));
    }

    child(document, &body, "h3", None)?.set_text_content(Some(&content.name));
    child(document, &body, "p", None)?.set_text_content(Some(&content.description));

    let link = child(
        document,
        &body,
        "a",
        Some("outline-none button button-outline"),
    )?;
    link.set_attribute("href", &content.detail_href)?;
    link.set_attribute("target", "_blank")?;
    link.set_text_content(Some("Explore"));

    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_names_carry_the_standard() {
        assert_eq!(popup_class("gold"), "location-popup flex flex-col gold");
        assert_eq!(popup_class(""), "location-popup flex flex-col");
        assert_eq!(
            marker_class("silver"),
            "location-marker location-marker--silver"
        );
        assert_eq!(marker_class(""), "location-marker");
    }

    #[test]
    fn css_url_quotes_path() {
        assert_eq!(
            css_url("/public/images/acre-popup.jpg"),
            r#"url("/public/images/acre-popup.jpg")"#
        );
    }

    #[test]
    fn css_url_escapes_quotes_in_slug() {
        let path = "/public/images/o'neil\");background:red;(\"-popup.jpg";
        assert_eq!(
            css_url(path),
            r#"url("/public/images/o'neil\");background:red;(\"-popup.jpg")"#
        );
        assert_eq!(css_url("a\\b\nc"), r#"url("a\\b\a c")"#);
    }
}
