//! OpenTelemetry GenAI Semantic Convention attribute names.
//!
//! Recorded on the completion span so exported traces line up with other
//! GenAI-instrumented services. Each constant matches a field declared on the
//! span; values are filled in with `Span::record`.

pub const GEN_AI_OPERATION_NAME: &str = "gen_ai.operation.name";

pub const GEN_AI_PROVIDER_NAME: &str = "gen_ai.provider.name";

pub const GEN_AI_REQUEST_MODEL: &str = "gen_ai.request.model";

pub const GEN_AI_REQUEST_MAX_TOKENS: &str = "gen_ai.request.max_tokens";

pub const GEN_AI_USAGE_INPUT_TOKENS: &str = "gen_ai.usage.input_tokens";

pub const GEN_AI_USAGE_OUTPUT_TOKENS: &str = "gen_ai.usage.output_tokens";

/// e.g. "end_turn", "max_tokens".
pub const GEN_AI_RESPONSE_FINISH_REASONS: &str = "gen_ai.response.finish_reasons";

pub const GEN_AI_RESPONSE_ID: &str = "gen_ai.response.id";

/// Chat completion operation.
pub const OP_CHAT: &str = "chat";
