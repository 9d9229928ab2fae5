use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],

    #[serde(skip_serializing_if = "GenerationConfig::is_empty")]
    generation_config: GenerationConfig,
}

impl<'a> GenerateContentRequest<'a> {
    pub fn text(prompt: &'a str) -> Self {
        Self {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
            generation_config: GenerationConfig::default(),
        }
    }

    pub fn json_schema(mut self, schema: Value) -> Self {
        self.generation_config.response_mime_type = Some("application/json");
        self.generation_config.response_schema = Some(schema);
        self
    }

    pub fn square_image(mut self) -> Self {
        self.generation_config.image_config = Some(ImageConfig {
            aspect_ratio: "1:1",
        });
        self
    }
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    image_config: Option<ImageConfig>,
}

impl GenerationConfig {
    fn is_empty(&self) -> bool {
        self.response_mime_type.is_none()
            && self.response_schema.is_none()
            && self.image_config.is_none()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageConfig {
    aspect_ratio: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    fn parts(&self) -> impl Iterator<Item = &ResponsePart> {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .into_iter()
            .flat_map(|content| content.parts.iter())
    }

    pub fn first_text(&self) -> Option<&str> {
        self.parts().find_map(|part| part.text.as_deref())
    }

    pub fn first_inline_data(&self) -> Option<&InlineData> {
        self.parts().find_map(|part| part.inline_data.as_ref())
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    text: Option<String>,
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    mime_type: String,
    data: String,
}

impl InlineData {
    pub fn data_url(&self) -> Result<url::Url, url::ParseError> {
        url::Url::parse(&format!("data:{};base64,{}", self.mime_type, self.data))
    }
}

#[cfg(test)]
mod tests {
    use super::{GenerateContentRequest, GenerateContentResponse};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn plain_request_has_no_generation_config() {
        let request = GenerateContentRequest::text("hello");

        assert_eq!(
            serde_json::to_value(&request).expect("hard-coded"),
            json!({ "contents": [{ "parts": [{ "text": "hello" }] }] })
        );
    }

    #[test]
    fn schema_request_asks_for_json() {
        let request = GenerateContentRequest::text("hello").json_schema(json!({ "type": "OBJECT" }));

        assert_eq!(
            serde_json::to_value(&request).expect("hard-coded")["generationConfig"],
            json!({
                "responseMimeType": "application/json",
                "responseSchema": { "type": "OBJECT" }
            })
        );
    }

    #[test]
    fn image_request_is_square() {
        let request = GenerateContentRequest::text("a dish").square_image();

        assert_eq!(
            serde_json::to_value(&request).expect("hard-coded")["generationConfig"],
            json!({ "imageConfig": { "aspectRatio": "1:1" } })
        );
    }

    #[test]
    fn finds_first_text_and_inline_data() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "inlineData": { "mimeType": "image/png", "data": "aGVsbG8=" } },
                        { "text": "{\"name\": \"Pho\"}" }
                    ]
                }
            }]
        }))
        .expect("hard-coded");

        assert_eq!(response.first_text(), Some("{\"name\": \"Pho\"}"));

        let image = response.first_inline_data().expect("has inline data");
        assert_eq!(
            image.data_url().expect("valid url").as_str(),
            "data:image/png;base64,aGVsbG8="
        );
    }

    #[test]
    fn blocked_response_has_no_parts() {
        let response: GenerateContentResponse =
            serde_json::from_value(json!({ "promptFeedback": { "blockReason": "SAFETY" } }))
                .expect("hard-coded");

        assert_eq!(response.first_text(), None);
        assert!(response.first_inline_data().is_none());
    }
}
