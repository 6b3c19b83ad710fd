//! End-to-end voting scenarios against the real store adapters.

use super::{InMemoryTripStore, JsonFileTripStore};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;
use tripvote_application::{
    CastVoteUseCase, ContentGenerator, CreateTripInput, CreateTripUseCase, GenerateItemsInput,
    GenerateTripItemsUseCase, GenerationRequest, GeneratorError, JoinTripInput, JoinTripUseCase,
    NoProgress, OpenSessionUseCase, Preferences, StageAggregator, StageDecision, TripStore,
    VoteReceipt, VotingParams,
};
use tripvote_domain::{
    BudgetTier, ItemDetails, Participant, Stage, Trip, Vote, VoteValue, catalog::fallback,
};

/// Returns the first `limit` built-in destinations and fails for other stages.
struct ShortGenerator {
    limit: usize,
}

#[async_trait]
impl ContentGenerator for ShortGenerator {
    fn name(&self) -> &str {
        "short"
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<ItemDetails>, GeneratorError> {
        match request.stage {
            Stage::Destinations => Ok(fallback::destinations()
                .into_iter()
                .take(self.limit)
                .collect()),
            other => Err(GeneratorError::Empty(other)),
        }
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn trip_with_group(store: Arc<dyn TripStore>, others: &[&str]) -> (Trip, Vec<Participant>) {
    let created = CreateTripUseCase::new(store.clone())
        .execute(
            CreateTripInput::new("Summer", date(2026, 7, 1), date(2026, 7, 8), BudgetTier::MidRange)
                .with_creator("Ana", None),
        )
        .await
        .unwrap();

    let mut group = vec![created.creator];
    for name in others {
        let joined = JoinTripUseCase::new(store.clone())
            .execute(JoinTripInput::new(created.trip.id.as_str(), *name))
            .await
            .unwrap();
        group.push(joined.participant);
    }
    (created.trip, group)
}

async fn generate(store: Arc<dyn TripStore>, trip: &Trip, generator: Arc<dyn ContentGenerator>) {
    let preferences = Preferences {
        destinations: "Somewhere warm".to_string(),
        ..Default::default()
    };
    GenerateTripItemsUseCase::new(store, generator)
        .execute(GenerateItemsInput::new(trip.id.clone(), preferences))
        .await
        .unwrap();
}

/// Vote through the participant's current stage with `values`, in order.
async fn vote_through(
    store: Arc<dyn TripStore>,
    trip: &Trip,
    participant: &Participant,
    values: &[VoteValue],
) -> Vec<VoteReceipt> {
    let mut opened = OpenSessionUseCase::new(store.clone())
        .with_params(VotingParams::default().with_cooldown(Duration::ZERO))
        .execute(&trip.id, &participant.id)
        .await
        .unwrap();
    let cast = CastVoteUseCase::new(store);

    let mut receipts = Vec::new();
    for value in values {
        let item_id = opened.session.current_item().cloned().unwrap();
        let receipt = cast
            .submit_vote(&trip.id, &mut opened.session, &item_id, *value, &NoProgress)
            .await
            .unwrap();
        receipts.push(receipt);
    }
    receipts
}

async fn current_stage(store: &Arc<dyn TripStore>, trip: &Trip) -> Stage {
    store.get_trip(&trip.id).await.unwrap().unwrap().current_stage
}

async fn flag(store: &Arc<dyn TripStore>, trip: &Trip, participant: &Participant) -> bool {
    store
        .get_participant(&trip.id, &participant.id)
        .await
        .unwrap()
        .unwrap()
        .has_completed(Stage::Destinations)
}

#[tokio::test]
async fn test_two_participants_close_destinations() {
    let store: Arc<dyn TripStore> = Arc::new(InMemoryTripStore::new());
    let (trip, group) = trip_with_group(store.clone(), &["Ben"]).await;
    generate(store.clone(), &trip, Arc::new(ShortGenerator { limit: 3 })).await;

    let (ana, ben) = (&group[0], &group[1]);
    let receipts = vote_through(
        store.clone(),
        &trip,
        ana,
        &[VoteValue::Like, VoteValue::Pass],
    )
    .await;
    assert!(receipts.iter().all(|r| r.decision.is_none()));
    assert!(!flag(&store, &trip, ana).await);

    let last = vote_through(store.clone(), &trip, ana, &[VoteValue::Like]).await;
    assert!(flag(&store, &trip, ana).await);
    assert!(matches!(
        last[0].decision,
        Some(StageDecision::Pending { ref waiting_on }) if waiting_on.len() == 1
    ));
    assert_eq!(current_stage(&store, &trip).await, Stage::Destinations);

    let receipts = vote_through(
        store.clone(),
        &trip,
        ben,
        &[VoteValue::Like, VoteValue::Like, VoteValue::Pass],
    )
    .await;
    assert_eq!(
        receipts[2].decision,
        Some(StageDecision::Advanced {
            from: Stage::Destinations,
            to: Stage::Accommodations,
        })
    );
    assert_eq!(current_stage(&store, &trip).await, Stage::Accommodations);

    let counts = StageAggregator::new(store.clone())
        .compute_vote_counts(&trip.id, Stage::Destinations)
        .await
        .unwrap();
    assert_eq!(counts.total_votes(), 6);
}

#[tokio::test]
async fn test_short_generation_completes_on_generated_items_only() {
    let store: Arc<dyn TripStore> = Arc::new(InMemoryTripStore::new());
    let (trip, group) = trip_with_group(store.clone(), &["Ben"]).await;
    generate(store.clone(), &trip, Arc::new(ShortGenerator { limit: 5 })).await;

    let items = store
        .items_for_stage(&trip.id, Stage::Destinations)
        .await
        .unwrap();
    assert_eq!(items.len(), 5);

    for participant in &group {
        vote_through(store.clone(), &trip, participant, &[VoteValue::Like; 5]).await;
    }
    assert_eq!(current_stage(&store, &trip).await, Stage::Accommodations);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_advance_is_deterministic() {
    let store: Arc<dyn TripStore> = Arc::new(InMemoryTripStore::new());
    let (trip, group) = trip_with_group(store.clone(), &["Ben"]).await;
    for participant in &group {
        store
            .set_stage_complete(&trip.id, &participant.id, Stage::Destinations, true)
            .await
            .unwrap();
    }

    let first = StageAggregator::new(store.clone());
    let second = StageAggregator::new(store.clone());
    let (a, b) = tokio::join!(
        first.check_stage_completion(&trip.id, Stage::Destinations),
        second.check_stage_completion(&trip.id, Stage::Destinations),
    );

    let advanced = StageDecision::Advanced {
        from: Stage::Destinations,
        to: Stage::Accommodations,
    };
    assert_eq!(a.unwrap(), advanced);
    assert_eq!(b.unwrap(), advanced);
    assert_eq!(current_stage(&store, &trip).await, Stage::Accommodations);
}

#[tokio::test]
async fn test_revote_overwrites_and_counts_are_stable() {
    let store: Arc<dyn TripStore> = Arc::new(InMemoryTripStore::new());
    let (trip, group) = trip_with_group(store.clone(), &["Ben"]).await;
    generate(store.clone(), &trip, Arc::new(ShortGenerator { limit: 2 })).await;
    let ana = &group[0];

    vote_through(store.clone(), &trip, ana, &[VoteValue::Like]).await;

    let mut opened = OpenSessionUseCase::new(store.clone())
        .with_params(VotingParams::default().with_cooldown(Duration::ZERO))
        .execute(&trip.id, &ana.id)
        .await
        .unwrap();
    let first_item = opened.items[0].id.clone();
    opened.session.rewind_to(&first_item).unwrap();
    CastVoteUseCase::new(store.clone())
        .submit_vote(&trip.id, &mut opened.session, &first_item, VoteValue::Pass, &NoProgress)
        .await
        .unwrap();

    let votes = store
        .votes_by_participant(&trip.id, Stage::Destinations, &ana.id)
        .await
        .unwrap();
    assert_eq!(votes.len(), 1);
    assert_eq!(votes[0].value, VoteValue::Pass);

    let aggregator = StageAggregator::new(store.clone());
    let once = aggregator
        .compute_vote_counts(&trip.id, Stage::Destinations)
        .await
        .unwrap();
    let twice = aggregator
        .compute_vote_counts(&trip.id, Stage::Destinations)
        .await
        .unwrap();
    assert_eq!(once, twice);
    assert_eq!(once.get(&first_item).passes, 1);
    assert_eq!(once.get(&first_item).likes, 0);
}

#[tokio::test]
async fn test_flag_follows_votes_after_reopen() {
    let store: Arc<dyn TripStore> = Arc::new(InMemoryTripStore::new());
    let (trip, group) = trip_with_group(store.clone(), &["Ben"]).await;
    generate(store.clone(), &trip, Arc::new(ShortGenerator { limit: 2 })).await;
    let ana = &group[0];

    vote_through(store.clone(), &trip, ana, &[VoteValue::Like, VoteValue::Like]).await;
    store
        .set_stage_complete(&trip.id, &ana.id, Stage::Destinations, false)
        .await
        .unwrap();

    let opened = OpenSessionUseCase::new(store.clone())
        .execute(&trip.id, &ana.id)
        .await
        .unwrap();

    assert!(opened.participant.has_completed(Stage::Destinations));
    assert!(opened.session.is_stage_done());
}

#[tokio::test]
async fn test_two_file_stores_share_one_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trips.json");
    let ana_side: Arc<dyn TripStore> = Arc::new(JsonFileTripStore::open(&path));
    let ben_side: Arc<dyn TripStore> = Arc::new(JsonFileTripStore::open(&path));

    let (trip, _) = trip_with_group(ana_side.clone(), &[]).await;
    let ben = JoinTripUseCase::new(ben_side.clone())
        .execute(JoinTripInput::new(trip.id.as_str(), "Ben"))
        .await
        .unwrap()
        .participant;
    generate(ana_side.clone(), &trip, Arc::new(ShortGenerator { limit: 1 })).await;

    let ana = ana_side.participants(&trip.id).await.unwrap()[0].clone();
    vote_through(ana_side.clone(), &trip, &ana, &[VoteValue::Like]).await;
    let receipts = vote_through(ben_side.clone(), &trip, &ben, &[VoteValue::Pass]).await;

    assert!(matches!(
        receipts[0].decision,
        Some(StageDecision::Advanced { to: Stage::Accommodations, .. })
    ));
    assert_eq!(current_stage(&ana_side, &trip).await, Stage::Accommodations);
    assert_eq!(ana_side.count_votes(&trip.id).await.unwrap(), 2);
}

#[test]
fn test_concurrent_file_writers_keep_snapshot_whole() {
    const ROUNDS: usize = 40;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trips.json");
    let runtime = || {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
    };

    let setup: Arc<dyn TripStore> = Arc::new(JsonFileTripStore::open(&path));
    let (trip, group, items) = runtime().block_on(async {
        let (trip, group) = trip_with_group(setup.clone(), &["Ben", "Cleo", "Dev"]).await;
        generate(setup.clone(), &trip, Arc::new(ShortGenerator { limit: 8 })).await;
        let items = setup
            .items_for_stage(&trip.id, Stage::Destinations)
            .await
            .unwrap();
        (trip, group, items)
    });

    let advanced = std::thread::scope(|scope| {
        let writers: Vec<_> = group
            .iter()
            .enumerate()
            .map(|(index, participant)| {
                let (trip, items, path) = (&trip, &items, &path);
                scope.spawn(move || {
                    let store: Arc<dyn TripStore> = Arc::new(JsonFileTripStore::open(path));
                    runtime().block_on(async move {
                        let mut advanced = None;
                        for round in 0..ROUNDS {
                            let item = &items[round % items.len()];
                            let value = if round % 2 == 0 {
                                VoteValue::Like
                            } else {
                                VoteValue::Pass
                            };
                            store
                                .upsert_vote(&Vote::new(
                                    trip.id.clone(),
                                    Stage::Destinations,
                                    item.id.clone(),
                                    participant.id.clone(),
                                    value,
                                ))
                                .await
                                .unwrap();
                            if index == 0 && round == ROUNDS / 2 {
                                advanced = Some(
                                    store
                                        .advance_stage(
                                            &trip.id,
                                            Stage::Destinations,
                                            Stage::Accommodations,
                                        )
                                        .await
                                        .unwrap(),
                                );
                            }
                        }
                        advanced
                    })
                })
            })
            .collect();
        writers
            .into_iter()
            .filter_map(|writer| writer.join().unwrap())
            .collect::<Vec<_>>()
    });

    assert_eq!(advanced, vec![Stage::Accommodations]);
    let reader: Arc<dyn TripStore> = Arc::new(JsonFileTripStore::open(&path));
    runtime().block_on(async {
        assert_eq!(current_stage(&reader, &trip).await, Stage::Accommodations);
        assert_eq!(
            reader.count_votes(&trip.id).await.unwrap(),
            group.len() * items.len()
        );
    });
    let leftovers = std::fs::read_dir(dir.path())
        .unwrap()
        .filter(|entry| {
            entry
                .as_ref()
                .unwrap()
                .file_name()
                .to_string_lossy()
                .ends_with(".tmp")
        })
        .count();
    assert_eq!(leftovers, 0);
}
