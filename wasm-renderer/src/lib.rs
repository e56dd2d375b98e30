use emolens::controller::{AnalysisTicket, UploadController, UploadState};
use emolens::detection::parse_response;
use emolens::emotion::style_for;
use emolens::selection::is_image_mime;
use emolens::{
    AnalysisOutcome, CandidateFile, DetectError, ImageSource, Preview, RenderedResult, UploadError,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Lighten (positive) or darken (negative) a `#rrggbb` color by a percentage
#[wasm_bindgen(js_name = adjustColor)]
pub fn adjust_color(color: &str, percent: f64) -> Result<String, JsError> {
    emolens::adjust_color(color, percent).map_err(|e| JsError::new(&e.to_string()))
}

#[wasm_bindgen(js_name = isImageType)]
pub fn is_image_type(mime: &str) -> bool {
    is_image_mime(mime)
}

/// Parse a raw `/api/detect` body and return the display data
#[wasm_bindgen(js_name = renderResult)]
pub fn render_result(body: &str) -> Result<JsValue, JsError> {
    let rendered = render_body(body).map_err(|msg| JsError::new(&msg))?;
    to_js(&rendered)
}

#[wasm_bindgen(js_name = emotionStyle)]
pub fn emotion_style(label: &str) -> Result<JsValue, JsError> {
    to_js(&style_for(label))
}

fn render_body(body: &str) -> Result<RenderedResult, String> {
    let result = parse_response(body).map_err(|e| UploadError::from(e).notification())?;
    emolens::render(&result).map_err(|e| UploadError::Transport(e.to_string()).notification())
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsError::new(&e.to_string()))
}

fn state_name(state: UploadState) -> &'static str {
    match state {
        UploadState::Idle => "idle",
        UploadState::Previewing => "previewing",
        UploadState::Analyzing => "analyzing",
        UploadState::ShowingResults => "results",
    }
}

/// The upload state machine for a browser page. The page does the `fetch`
/// itself and hands the body back with the ticket number it was given.
#[wasm_bindgen]
pub struct UploadMachine {
    controller: UploadController,
    pending: Option<AnalysisTicket>,
}

#[wasm_bindgen]
impl UploadMachine {
    #[wasm_bindgen(constructor)]
    pub fn new() -> UploadMachine {
        UploadMachine {
            controller: UploadController::new(),
            pending: None,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        state_name(self.controller.state()).to_string()
    }

    /// Hold a picked or dropped file and return its preview
    pub fn select(
        &mut self,
        file_name: &str,
        mime: &str,
        bytes: &js_sys::Uint8Array,
        dropped: bool,
    ) -> Result<JsValue, JsError> {
        let candidate = CandidateFile::new(file_name, mime, bytes.to_vec());
        let preview = self.select_candidate(candidate, dropped).map_err(|msg| JsError::new(&msg))?;
        to_js(&preview)
    }

    /// Start an analysis; the returned number goes back into
    /// `completeAnalysis` or `failAnalysis`
    #[wasm_bindgen(js_name = beginAnalysis)]
    pub fn begin_analysis(&mut self) -> Result<f64, JsError> {
        self.begin().map_err(|msg| JsError::new(&msg))
    }

    /// Feed back the service body. Returns the rendered result, or `null`
    /// when the analysis was superseded.
    #[wasm_bindgen(js_name = completeAnalysis)]
    pub fn complete_analysis(&mut self, ticket: f64, body: &str) -> Result<JsValue, JsError> {
        match self.complete(ticket, parse_response(body)) {
            Ok(Some(rendered)) => to_js(&rendered),
            Ok(None) => Ok(JsValue::NULL),
            Err(msg) => Err(JsError::new(&msg)),
        }
    }

    /// Report a network failure for a ticket
    #[wasm_bindgen(js_name = failAnalysis)]
    pub fn fail_analysis(&mut self, ticket: f64, message: &str) -> Result<JsValue, JsError> {
        match self.complete(ticket, Err(DetectError::Transport(message.to_string()))) {
            Ok(_) => Ok(JsValue::NULL),
            Err(msg) => Err(JsError::new(&msg)),
        }
    }

    pub fn reset(&mut self) -> bool {
        self.pending = None;
        self.controller.reset()
    }
}

impl Default for UploadMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadMachine {
    fn select_candidate(
        &mut self,
        candidate: CandidateFile,
        dropped: bool,
    ) -> Result<Preview, String> {
        let source = if dropped { ImageSource::Drop } else { ImageSource::Picker };
        let ticket = self
            .controller
            .select_image(candidate, source)
            .map_err(|e| e.notification())?;
        self.pending = None;
        let loaded = ticket.load();
        let preview = loaded.preview().clone();
        self.controller.complete_preview(loaded);
        Ok(preview)
    }

    fn begin(&mut self) -> Result<f64, String> {
        let ticket = self.controller.begin_analysis().map_err(|e| e.notification())?;
        let generation = ticket.generation() as f64;
        self.pending = Some(ticket);
        Ok(generation)
    }

    fn complete(
        &mut self,
        ticket: f64,
        response: Result<emolens::DetectionResult, DetectError>,
    ) -> Result<Option<RenderedResult>, String> {
        let pending = match self.pending.take() {
            Some(t) if t.generation() as f64 == ticket => t,
            other => {
                self.pending = other;
                log(&format!("dropping stale response for ticket {}", ticket));
                return Ok(None);
            }
        };
        match self.controller.complete_analysis(pending, response) {
            AnalysisOutcome::Rendered(rendered) => Ok(Some(rendered)),
            AnalysisOutcome::Failed(err) => Err(err.notification()),
            AnalysisOutcome::Stale => Ok(None),
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn log(message: &str) {
    web_sys::console::debug_1(&JsValue::from_str(message));
}

#[cfg(not(target_arch = "wasm32"))]
fn log(_message: &str) {}
