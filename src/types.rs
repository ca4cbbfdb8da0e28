//! Request and response types for Nebius chat completion calls.
//!
//! Nebius AI Studio speaks the OpenAI chat completion wire format, so these
//! types mirror that shape. Only the fields the client actually inspects are
//! typed strictly; response-side types are lenient about everything else.

use serde::{Deserialize, Serialize};

use crate::model::Model;

/// Sampling temperature issued with every request.
pub const TEMPERATURE: f64 = 0.7;

/// Output token cap issued with every request.
pub const MAX_TOKENS: u32 = 4000;

/// A message in a chat conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    /// The role of the message author (e.g. "system", "user", "assistant", "tool").
    pub role: String,

    /// The content of the message. Assistant messages that only carry tool
    /// calls have no content, which serializes as `null`.
    pub content: Option<String>,

    /// For tool-result messages, the ID of the tool call this is a response to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,

    /// Tool calls requested by the assistant in this message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
}

impl ChatMessage {
    /// Create a simple message with role and content.
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: Some(content.into()),
            tool_call_id: None,
            tool_calls: None,
        }
    }

    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }

    /// Create a tool-result message answering the given tool call.
    pub fn tool(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: "tool".into(),
            content: Some(content.into()),
            tool_call_id: Some(tool_call_id.into()),
            tool_calls: None,
        }
    }
}

/// A tool call requested by the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCall {
    /// Unique identifier for this tool call.
    pub id: String,

    /// The type of tool call. Currently always "function".
    #[serde(rename = "type")]
    pub call_type: String,

    /// The function to invoke.
    pub function: FunctionCall,
}

/// A function invocation within a tool call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionCall {
    /// The name of the function to call.
    pub name: String,

    /// The arguments as a JSON string.
    pub arguments: String,
}

/// A function tool offered to the model.
///
/// Passed through to the API unmodified; the client never interprets the
/// parameter schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolDefinition {
    /// The type of tool. Currently always "function".
    #[serde(rename = "type")]
    pub tool_type: String,

    /// The function declaration.
    pub function: FunctionSpec,
}

impl ToolDefinition {
    /// Declare a function tool with a JSON-Schema style parameter object.
    pub fn function(
        name: impl Into<String>,
        description: impl Into<String>,
        properties: serde_json::Map<String, serde_json::Value>,
        required: Vec<String>,
    ) -> Self {
        Self {
            tool_type: "function".into(),
            function: FunctionSpec {
                name: name.into(),
                description: description.into(),
                parameters: ToolParameters {
                    schema_type: "object".into(),
                    properties,
                    required,
                },
            },
        }
    }
}

/// The function half of a [`ToolDefinition`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionSpec {
    /// The function name the model may call.
    pub name: String,

    /// What the function does, for the model's benefit.
    pub description: String,

    /// JSON-Schema style declaration of the accepted arguments.
    pub parameters: ToolParameters,
}

/// The parameter schema of a function tool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolParameters {
    /// The schema type. Currently always "object".
    #[serde(rename = "type")]
    pub schema_type: String,

    /// Property name to schema fragment.
    pub properties: serde_json::Map<String, serde_json::Value>,

    /// Names of the required properties.
    pub required: Vec<String>,
}

/// A chat completion request.
///
/// Built once per logical call and reused verbatim across retries of that
/// call; only the `stream` flag differs between the buffered and streaming
/// entry points.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatRequest {
    /// The model to query.
    pub model: Model,

    /// The conversation messages, in order.
    pub messages: Vec<ChatMessage>,

    /// Sampling temperature. Always [`TEMPERATURE`].
    pub temperature: f64,

    /// Maximum number of tokens to generate. Always [`MAX_TOKENS`].
    pub max_tokens: u32,

    /// Tool definitions available to the model. Omitted when empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,

    /// Tool selection mode. `"auto"` whenever tools are attached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<String>,

    /// Whether to stream the response. Omitted from the wire when false.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub stream: bool,
}

impl ChatRequest {
    /// Build the payload for one logical call.
    ///
    /// Tools are attached, with automatic tool selection, only when the
    /// given list is non-empty.
    pub fn new(
        model: Model,
        messages: Vec<ChatMessage>,
        tools: Option<Vec<ToolDefinition>>,
        stream: bool,
    ) -> Self {
        let tools = tools.filter(|t| !t.is_empty());
        let tool_choice = tools.as_ref().map(|_| "auto".to_string());
        Self {
            model,
            messages,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            tools,
            tool_choice,
            stream,
        }
    }
}

/// A buffered chat completion response.
///
/// Only `choices` is required when deserializing; everything else is
/// tolerated missing.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatResponse {
    /// Unique identifier for this completion.
    #[serde(default)]
    pub id: String,

    /// The list of completion choices.
    pub choices: Vec<Choice>,

    /// Token usage statistics for this request, if available.
    #[serde(default)]
    pub usage: Option<Usage>,

    /// The model that generated the response.
    #[serde(default)]
    pub model: String,
}

/// A single completion choice within a response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Choice {
    /// The index of this choice in the list.
    #[serde(default)]
    pub index: i32,

    /// The assistant's response message.
    pub message: ChatMessage,

    /// Why generation stopped (e.g. "stop", "tool_calls", "length").
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Token usage statistics for a completion request.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct Usage {
    /// Number of tokens in the prompt.
    #[serde(default)]
    pub prompt_tokens: i32,

    /// Number of tokens in the generated completion.
    #[serde(default)]
    pub completion_tokens: i32,

    /// Total tokens used (prompt + completion).
    #[serde(default)]
    pub total_tokens: i32,
}

// ── Streaming types ─────────────────────────────────────────────────────

/// One parsed streaming chunk, in the OpenAI `chat.completion.chunk` shape.
///
/// Chunks are forwarded to the consumer exactly as received; the client
/// never aggregates or interprets deltas.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ChatChunk {
    /// Unique identifier for the completion this chunk belongs to.
    #[serde(default)]
    pub id: String,

    /// The model generating the response.
    #[serde(default)]
    pub model: String,

    /// The chunk choices array (usually 1 element, may be empty).
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,

    /// Usage statistics (some deployments include this in the final chunk).
    #[serde(default)]
    pub usage: Option<Usage>,
}

/// A single choice within a streaming chunk.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ChunkChoice {
    /// The index of this choice in the list.
    #[serde(default)]
    pub index: i32,

    /// The delta object containing partial content.
    #[serde(default)]
    pub delta: ChunkDelta,

    /// Finish reason (present only on the final chunk of a choice).
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// The delta content within a streaming choice.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ChunkDelta {
    /// Message role (only in the first delta of a choice).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Partial text content (if the model is generating text).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Partial tool calls (if the model is invoking tools).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCallDelta>>,
}

/// A tool call delta within a streaming choice.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ToolCallDelta {
    /// Index of this tool call in the tool_calls array.
    pub index: usize,

    /// Tool call ID (only in the first delta for this tool call).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Function info (name and/or argument fragments).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<FunctionCallDelta>,
}

/// Function details within a tool call delta.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct FunctionCallDelta {
    /// Function name (only in the first delta for this tool call).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Partial arguments fragment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_message_new_helpers() {
        let sys = ChatMessage::system("You are helpful.");
        assert_eq!(sys.role, "system");
        assert_eq!(sys.content.as_deref(), Some("You are helpful."));
        assert!(sys.tool_call_id.is_none());
        assert!(sys.tool_calls.is_none());

        let user = ChatMessage::user("Hello");
        assert_eq!(user.role, "user");

        let asst = ChatMessage::assistant("Hi there");
        assert_eq!(asst.role, "assistant");

        let tool = ChatMessage::tool("call_1", "42");
        assert_eq!(tool.role, "tool");
        assert_eq!(tool.tool_call_id.as_deref(), Some("call_1"));
    }

    #[test]
    fn chat_message_serde_roundtrip() {
        let msg = ChatMessage::user("Hello, world!");
        let json = serde_json::to_string(&msg).unwrap();
        let parsed: ChatMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(msg, parsed);
    }

    #[test]
    fn chat_message_skips_none_fields_but_keeps_null_content() {
        let msg = ChatMessage {
            role: "assistant".into(),
            content: None,
            tool_call_id: None,
            tool_calls: None,
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""content":null"#));
        assert!(!json.contains("tool_call_id"));
        assert!(!json.contains("tool_calls"));
    }

    #[test]
    fn chat_message_with_tool_calls_roundtrip() {
        let msg = ChatMessage {
            role: "assistant".into(),
            content: None,
            tool_call_id: None,
            tool_calls: Some(vec![ToolCall {
                id: "call_abc123".into(),
                call_type: "function".into(),
                function: FunctionCall {
                    name: "get_weather".into(),
                    arguments: r#"{"city":"London"}"#.into(),
                },
            }]),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("tool_calls"));
        assert!(json.contains("call_abc123"));
        let parsed: ChatMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(msg, parsed);
    }

    #[test]
    fn tool_call_type_field_renamed() {
        let tc = ToolCall {
            id: "tc1".into(),
            call_type: "function".into(),
            function: FunctionCall {
                name: "search".into(),
                arguments: "{}".into(),
            },
        };
        let json = serde_json::to_string(&tc).unwrap();
        assert!(json.contains(r#""type":"function""#));
        assert!(!json.contains("call_type"));
    }

    #[test]
    fn tool_definition_function_shape() {
        let mut props = serde_json::Map::new();
        props.insert("city".into(), serde_json::json!({"type": "string"}));
        let tool = ToolDefinition::function(
            "get_weather",
            "Look up current weather",
            props,
            vec!["city".into()],
        );
        let json = serde_json::to_value(&tool).unwrap();
        assert_eq!(json["type"], "function");
        assert_eq!(json["function"]["name"], "get_weather");
        assert_eq!(json["function"]["parameters"]["type"], "object");
        assert_eq!(json["function"]["parameters"]["required"][0], "city");
    }

    #[test]
    fn chat_request_without_tools() {
        let req = ChatRequest::new(
            Model::default(),
            vec![ChatMessage::user("Hi")],
            None,
            false,
        );
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains(r#""model":"Qwen/Qwen3-235B-A22B-Instruct-2507""#));
        assert!(json.contains(r#""temperature":0.7"#));
        assert!(json.contains(r#""max_tokens":4000"#));
        assert!(!json.contains("tools"));
        assert!(!json.contains("tool_choice"));
        assert!(!json.contains("stream"));
    }

    #[test]
    fn chat_request_empty_tools_treated_as_absent() {
        let req = ChatRequest::new(
            Model::default(),
            vec![ChatMessage::user("Hi")],
            Some(Vec::new()),
            false,
        );
        let json = serde_json::to_string(&req).unwrap();
        assert!(!json.contains("tools"));
        assert!(!json.contains("tool_choice"));
    }

    #[test]
    fn chat_request_with_tools_enables_auto_choice() {
        let tool =
            ToolDefinition::function("search", "Search the web", serde_json::Map::new(), vec![]);
        let req = ChatRequest::new(
            Model::Llama33_70B,
            vec![ChatMessage::user("find rust docs")],
            Some(vec![tool]),
            false,
        );
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains(r#""tools":["#));
        assert!(json.contains(r#""tool_choice":"auto""#));
    }

    #[test]
    fn chat_request_stream_flag_serialized_only_when_set() {
        let streamed = ChatRequest::new(
            Model::default(),
            vec![ChatMessage::user("Hi")],
            None,
            true,
        );
        let json = serde_json::to_string(&streamed).unwrap();
        assert!(json.contains(r#""stream":true"#));
    }

    #[test]
    fn chat_response_deserialization() {
        let json = r#"{
            "id": "chatcmpl-abc123",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": "Hello!"
                },
                "finish_reason": "stop"
            }],
            "usage": {
                "prompt_tokens": 10,
                "completion_tokens": 5,
                "total_tokens": 15
            },
            "model": "Qwen/Qwen3-235B-A22B-Instruct-2507"
        }"#;
        let resp: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.id, "chatcmpl-abc123");
        assert_eq!(resp.choices.len(), 1);
        assert_eq!(resp.choices[0].message.content.as_deref(), Some("Hello!"));
        assert_eq!(resp.choices[0].finish_reason.as_deref(), Some("stop"));
        let usage = resp.usage.unwrap();
        assert_eq!(usage.prompt_tokens, 10);
        assert_eq!(usage.total_tokens, 15);
    }

    #[test]
    fn chat_response_choices_only() {
        let json = r#"{
            "choices": [{
                "message": {"role": "assistant", "content": "Ok"}
            }]
        }"#;
        let resp: ChatResponse = serde_json::from_str(json).unwrap();
        assert!(resp.id.is_empty());
        assert!(resp.usage.is_none());
        assert!(resp.choices[0].finish_reason.is_none());
    }

    #[test]
    fn chunk_deserialization_text_delta() {
        let json = r#"{
            "id": "chatcmpl-1",
            "object": "chat.completion.chunk",
            "created": 1717000000,
            "model": "Qwen/Qwen3-235B-A22B-Instruct-2507",
            "choices": [{"index": 0, "delta": {"content": "Hel"}, "finish_reason": null}]
        }"#;
        let chunk: ChatChunk = serde_json::from_str(json).unwrap();
        assert_eq!(chunk.choices.len(), 1);
        assert_eq!(chunk.choices[0].delta.content.as_deref(), Some("Hel"));
        assert!(chunk.choices[0].finish_reason.is_none());
    }

    #[test]
    fn chunk_deserialization_tool_call_delta() {
        let json = r#"{
            "choices": [{
                "index": 0,
                "delta": {
                    "tool_calls": [{
                        "index": 0,
                        "id": "call_9",
                        "function": {"name": "get_weather", "arguments": ""}
                    }]
                }
            }]
        }"#;
        let chunk: ChatChunk = serde_json::from_str(json).unwrap();
        let calls = chunk.choices[0].delta.tool_calls.as_ref().unwrap();
        assert_eq!(calls[0].id.as_deref(), Some("call_9"));
        assert_eq!(
            calls[0].function.as_ref().unwrap().name.as_deref(),
            Some("get_weather")
        );
    }

    #[test]
    fn chunk_deserialization_empty_choices() {
        let chunk: ChatChunk = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(chunk.choices.is_empty());
    }
}
