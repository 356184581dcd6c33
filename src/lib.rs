pub mod heuristics;
pub mod io;
pub mod llm;
pub mod models;
pub mod stages;

pub use heuristics::{FillerVocabulary, Language};
pub use io::{
    HumanReport, load_interpretation_file, parse_transcript_file, read_transcript_file,
    write_result_json,
};
pub use llm::{AnthropicClient, AnthropicConfig, CoachingModel, LlmCoaching, LlmError};
pub use models::{
    AnalysisSummary, CoachingNarrative, FullAnalysisResult, Interpretation, NarrativeSource,
    ParsedTranscript, TalkMetrics, TranscriptTurn,
};
pub use stages::{
    AnalysisConfig, InterpretStageConfig, RenderConfig, analyze_locally, analyze_offline,
    analyze_with_model, build_fallback_coaching_narrative, build_parsed_transcript,
    calculate_talk_metrics, execute_render, identify_me_speaker, parse_transcript,
};
