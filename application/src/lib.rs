//! Application layer for tripvote
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{GenerationParams, VotingParams};
pub use ports::{
    activity_logger::{ActivityEvent, ActivityLogger, NoActivityLogger},
    content_generator::{ContentGenerator, GenerationRequest, GeneratorError, Preferences},
    progress::{NoProgress, VotingProgressNotifier},
    realtime::{ChangeEvent, ChangeFeed, ChangeKind, ChangeSubscription, ChangeTable},
    store::{ItemCatalog, ParticipantRegistry, StoreError, TripRepository, TripStore, VoteStore},
};
pub use use_cases::cast_vote::{CastVoteUseCase, VoteReceipt, VotingError};
pub use use_cases::create_trip::{
    CreateTripError, CreateTripInput, CreateTripOutput, CreateTripUseCase,
};
pub use use_cases::generate_items::{
    GenerateItemsError, GenerateItemsInput, GenerateItemsOutput, GenerateTripItemsUseCase,
    ItemSource, StageGeneration,
};
pub use use_cases::join_trip::{JoinTripError, JoinTripInput, JoinTripOutput, JoinTripUseCase};
pub use use_cases::live_session::{LiveTripSession, LiveUpdate};
pub use use_cases::open_session::{OpenSessionUseCase, OpenedSession};
pub use use_cases::stage_aggregator::{
    AggregationError, StageAggregator, StageDecision, StageSnapshot,
};
pub use use_cases::trip_results::{
    StageSummary, TripResults, TripResultsError, TripResultsUseCase,
};
