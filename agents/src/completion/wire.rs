//! JSON bodies exchanged with the completion service (messages-style invoke API).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextBlock<'a> {
    pub text: &'a str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestMessage<'a> {
    pub role: &'static str,
    pub content: [TextBlock<'a>; 1],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InferenceConfig {
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvokeRequest<'a> {
    pub messages: [RequestMessage<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<[TextBlock<'a>; 1]>,
    pub inference_config: InferenceConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct InvokeResponse {
    pub output: Option<ResponseOutput>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResponseOutput {
    pub message: Option<ResponseMessage>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<Vec<ResponseBlock>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResponseBlock {
    pub text: Option<String>,
}

impl InvokeResponse {
    /// Text of the first content block, if the body has the expected shape.
    pub fn into_text(self) -> Option<String> {
        self.output?.message?.content?.into_iter().next()?.text
    }
}
