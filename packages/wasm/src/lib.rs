use autoletter_editor::{
    Document, EditSession, EditorError, FormatTag, MergeVariable, Mutation, MutationError, Selection,
};
use autoletter_preview::{render_preview, SampleValues};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn to_js(err: String) -> JsValue {
    JsValue::from_str(&err)
}

/// Mutation failures are reported by their own message
fn describe(err: EditorError) -> String {
    match err.as_mutation() {
        Some(mutation) => mutation.to_string(),
        None => err.to_string(),
    }
}

/// Selections arrive either as flat text offsets or as boundary points
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SelectionInput {
    Offsets { start: usize, end: usize },
    Points(Selection),
}

#[derive(Debug, Serialize)]
struct CursorView<'a> {
    start: usize,
    end: usize,
    collapsed: bool,
    selection: &'a Selection,
}

#[derive(Debug, Serialize)]
struct VariableView {
    name: &'static str,
    label: &'static str,
    token: String,
}

/// One editing surface: the document, its selection and the link dialog
#[wasm_bindgen]
pub struct Composer {
    session: EditSession,
}

impl Composer {
    pub fn from_html(html: &str) -> Result<Composer, String> {
        let document = Document::from_html(html).map_err(describe)?;
        Ok(Composer {
            session: EditSession::new("composer", document),
        })
    }

    pub fn replace_html(&mut self, html: &str) -> Result<bool, String> {
        self.session.set_html(html).map_err(describe)
    }

    pub fn select(&mut self, json: &str) -> Result<(), String> {
        let input: SelectionInput =
            serde_json::from_str(json).map_err(|e| format!("Invalid selection: {}", e))?;
        let fragment = self.session.document.fragment();

        let selection = match input {
            SelectionInput::Offsets { start, end } => Selection::from_text_offsets(fragment, start, end),
            SelectionInput::Points(selection) if selection.resolves_in(fragment) => selection,
            SelectionInput::Points(_) => return Err(MutationError::InvalidSelection.to_string()),
        };

        self.session.set_selection(selection);
        Ok(())
    }

    /// Apply at the live selection, returning the new markup
    pub fn run(&mut self, mutation: Mutation) -> Result<String, String> {
        self.session
            .apply(&mutation)
            .map(|edit| edit.html)
            .map_err(describe)
    }

    pub fn open_link_dialog(&mut self) -> Result<(), String> {
        self.session.begin_link().map_err(|e| e.to_string())
    }

    pub fn submit_link(&mut self, url: &str) -> Result<String, String> {
        self.session
            .confirm_link(url)
            .map(|edit| edit.html)
            .map_err(describe)
    }

    pub fn format_state_json(&self) -> String {
        let state = self.session.document.format_state(self.session.selection().as_ref());
        serde_json::to_string(&state).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn cursor_json(&self) -> String {
        let Some(selection) = self.session.selection() else {
            return "null".to_string();
        };
        let Some((start, end)) = selection.text_offsets(self.session.document.fragment()) else {
            return "null".to_string();
        };

        let view = CursorView {
            start,
            end,
            collapsed: selection.is_collapsed(),
            selection: &selection,
        };
        serde_json::to_string(&view).unwrap_or_else(|_| "null".to_string())
    }
}

#[wasm_bindgen]
impl Composer {
    #[wasm_bindgen(constructor)]
    pub fn new(html: &str) -> Result<Composer, JsValue> {
        Composer::from_html(html).map_err(to_js)
    }

    pub fn html(&self) -> String {
        self.session.document.html().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn version(&self) -> f64 {
        self.session.document.version as f64
    }

    /// Replace the content; returns whether anything changed
    #[wasm_bindgen(js_name = setHtml)]
    pub fn set_html(&mut self, html: &str) -> Result<bool, JsValue> {
        self.replace_html(html).map_err(to_js)
    }

    /// `{"start": 0, "end": 5}` or `{"start": {"path": [0, 0], "offset": 0}, "end": ...}`
    #[wasm_bindgen(js_name = setSelection)]
    pub fn set_selection(&mut self, json: &str) -> Result<(), JsValue> {
        self.select(json).map_err(to_js)
    }

    #[wasm_bindgen(js_name = clearSelection)]
    pub fn clear_selection(&mut self) {
        self.session.tracker_mut().clear();
    }

    #[wasm_bindgen(js_name = toggleBold)]
    pub fn toggle_bold(&mut self) -> Result<String, JsValue> {
        self.run(Mutation::ToggleFormat { tag: FormatTag::Bold }).map_err(to_js)
    }

    #[wasm_bindgen(js_name = toggleItalic)]
    pub fn toggle_italic(&mut self) -> Result<String, JsValue> {
        self.run(Mutation::ToggleFormat { tag: FormatTag::Italic }).map_err(to_js)
    }

    #[wasm_bindgen(js_name = insertList)]
    pub fn insert_list(&mut self, ordered: bool) -> Result<String, JsValue> {
        self.run(Mutation::InsertList { ordered }).map_err(to_js)
    }

    #[wasm_bindgen(js_name = beginLink)]
    pub fn begin_link(&mut self) -> Result<(), JsValue> {
        self.open_link_dialog().map_err(to_js)
    }

    #[wasm_bindgen(js_name = confirmLink)]
    pub fn confirm_link(&mut self, url: &str) -> Result<String, JsValue> {
        self.submit_link(url).map_err(to_js)
    }

    #[wasm_bindgen(js_name = cancelLink)]
    pub fn cancel_link(&mut self) {
        self.session.cancel_link();
    }

    pub fn unlink(&mut self) -> Result<String, JsValue> {
        self.run(Mutation::Unlink).map_err(to_js)
    }

    #[wasm_bindgen(js_name = insertVariable)]
    pub fn insert_variable(&mut self, name: &str) -> Result<String, JsValue> {
        self.run(Mutation::InsertVariable { name: name.to_string() }).map_err(to_js)
    }

    #[wasm_bindgen(js_name = pasteText)]
    pub fn paste_text(&mut self, text: &str) -> Result<String, JsValue> {
        self.run(Mutation::PasteText { text: text.to_string() }).map_err(to_js)
    }

    /// `{"bold": bool, "italic": bool, "link": bool}` at the live selection
    #[wasm_bindgen(js_name = formatState)]
    pub fn format_state(&self) -> String {
        self.format_state_json()
    }

    /// Live selection with its text offsets, or `null`
    pub fn cursor(&self) -> String {
        self.cursor_json()
    }
}

/// Toolbar entries for the merge-variable registry
#[wasm_bindgen(js_name = mergeVariables)]
pub fn merge_variables() -> String {
    let variables: Vec<VariableView> = MergeVariable::ALL
        .iter()
        .map(|v| VariableView {
            name: v.name(),
            label: v.label(),
            token: v.token(),
        })
        .collect();
    serde_json::to_string(&variables).unwrap_or_else(|_| "[]".to_string())
}

pub fn render_preview_with(html: &str, samples_json: &str) -> Result<String, String> {
    let overrides: BTreeMap<String, String> = if samples_json.trim().is_empty() {
        BTreeMap::new()
    } else {
        serde_json::from_str(samples_json).map_err(|e| format!("Invalid sample values: {}", e))?
    };

    let samples = SampleValues::default().with_overrides(overrides);
    render_preview(html, &samples).map_err(|e| e.to_string())
}

/// Sanitized preview of a body; `samples_json` overrides the default values
#[wasm_bindgen(js_name = renderPreview)]
pub fn render_preview_js(html: &str, samples_json: &str) -> Result<String, JsValue> {
    render_preview_with(html, samples_json).map_err(to_js)
}
