use crate::EnhancerState;

pub(crate) const STYLESHEET_ID: &str = "page-enhancer-styles";

const STYLESHEET: &str = "\
img[data-src] { opacity: 0; transition: opacity 0.3s; }
img.loaded { opacity: 1; }
.loading { opacity: 0.6; }
.error { outline: 1px solid #c0392b; }
.progressive-hidden { display: none; }
.load-more-btn { display: block; margin: 1em auto; }
th.sortable { cursor: pointer; user-select: none; }
th.sorted-asc::after { content: \" \\25B2\"; }
th.sorted-desc::after { content: \" \\25BC\"; }
th { position: relative; }
.column-resizer { position: absolute; top: 0; right: 0; width: 5px; height: 100%; cursor: col-resize; }
.column-resizer.resizing { background: rgba(0, 0, 0, 0.2); }
.virtual-scroll-container { position: relative; }
.search-error { color: #c0392b; padding: 0.5em; }
";

/// Appends the enhancer stylesheet to `<head>` (or the document root) once.
pub(crate) fn inject(state: &mut EnhancerState) {
    if state.doc.element_by_id(STYLESHEET_ID).is_some() {
        return;
    }
    let root = state.doc.root();
    let parent = state.doc.first_by_tag(root, "head").unwrap_or(root);
    let style = state.doc.create_element("style");
    state.doc.set_attr(style, "id", STYLESHEET_ID);
    state.doc.set_text_content(style, STYLESHEET);
    state.doc.append_child(parent, style);
    state.mark_dirty();
}
