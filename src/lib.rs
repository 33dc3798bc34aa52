pub mod error;
pub mod io;
pub mod llm;
pub mod minutes;
pub mod models;
pub mod pipeline;
pub mod stages;
pub mod text;

pub use error::DigestError;
pub use io::{
    load_transcript, parse_participant, parse_segments_json, write_json, HumanMinutes,
    HumanSummary,
};
pub use llm::{AnthropicClient, AnthropicConfig, Generator, ToolSpec};
pub use minutes::{compose_minutes, generate_minutes, MinutesConfig};
pub use models::{
    MeetingInfo, MinutesDocument, MinutesRecord, Participant, StructuredDocument, Topic,
    TopicDetail,
};
pub use pipeline::{summarize_transcript, SummaryConfig};
pub use stages::{chunk_stats, split_text, ChunkConfig, RequestConfig};
