use std::time::Instant;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rwfs_guard::{GuardResult, GuardedStore};
use rwfs_store::Record;
use tokio::task::JoinSet;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::config::WorkloadConfig;
use crate::error::{WorkloadError, WorkloadResult};
use crate::report::{RunReport, UserOutcome, UserStats, Verification};

/// Names of the records seeded for a run of `n`: `file_0` .. `file_{n-1}`.
pub fn record_names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("file_{i}")).collect()
}

/// The single operation a simulated user performs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UserAction {
    Read { name: String },
    Write { name: String, content: String },
}

impl UserAction {
    fn choose<R: Rng + ?Sized>(rng: &mut R, name: String, write_probability: f64) -> Self {
        if rng.gen_bool(write_probability) {
            Self::Write {
                name,
                content: rng.gen::<i32>().to_string(),
            }
        } else {
            Self::Read { name }
        }
    }

    pub fn target(&self) -> &str {
        match self {
            Self::Read { name } | Self::Write { name, .. } => name,
        }
    }

    async fn perform(self, store: &GuardedStore) -> GuardResult<UserOutcome> {
        match self {
            Self::Read { name } => {
                let hit = store.get(&name).await?.is_some();
                Ok(UserOutcome::Read { hit })
            }
            Self::Write { name, content } => {
                let hit = store.set_content(&name, content).await?;
                Ok(UserOutcome::Write { hit })
            }
        }
    }
}

/// Seeds records and runs simulated users against a [`GuardedStore`].
///
/// Every seed save and every user is a task on the tokio runtime. Each phase
/// joins all of its tasks before the next one starts, so no user runs until
/// seeding has finished.
pub struct WorkloadDriver {
    store: GuardedStore,
    config: WorkloadConfig,
    names: Vec<String>,
    rng: StdRng,
}

impl WorkloadDriver {
    pub fn new(store: GuardedStore, config: WorkloadConfig) -> WorkloadResult<Self> {
        config.validate()?;
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            store,
            config,
            names: Vec::new(),
            rng,
        })
    }

    pub fn config(&self) -> &WorkloadConfig {
        &self.config
    }

    /// Names seeded so far.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Save `n` records with the configured seed content, concurrently, and
    /// wait for every save.
    ///
    /// Any failed save fails the whole seed phase, but only after the others
    /// have been joined.
    pub async fn seed(&mut self, n: usize) -> WorkloadResult<usize> {
        let names = record_names(n);
        info!(names = ?names, "record names generated");

        let mut tasks = JoinSet::new();
        for name in &names {
            let store = self.store.clone();
            let record = Record::new(name.clone(), self.config.seed_content.clone());
            tasks.spawn(async move { store.save(record).await });
        }

        let mut failed = 0;
        let mut first = None;
        while let Some(joined) = tasks.join_next().await {
            let outcome = match joined {
                Ok(saved) => saved.map_err(WorkloadError::from),
                Err(e) => Err(WorkloadError::Task(e)),
            };
            if let Err(e) = outcome {
                warn!(error = %e, "seed save failed");
                failed += 1;
                first.get_or_insert(e);
            }
        }
        if let Some(source) = first {
            return Err(WorkloadError::Seed {
                failed,
                total: n,
                source: Box::new(source),
            });
        }

        self.names = names;
        info!(count = n, "seeding complete");
        Ok(n)
    }

    /// One user, one operation: write with the configured probability,
    /// otherwise read. Draws from the driver's generator, so a fixed
    /// `rng_seed` fixes the choice and the written content.
    pub async fn simulate_user(&mut self, name: &str) -> GuardResult<UserOutcome> {
        let p = self.config.write_probability;
        let action = UserAction::choose(&mut self.rng, name.to_string(), p);
        action.perform(&self.store).await
    }

    /// Draw the actions for `users` users from the driver's generator.
    pub fn plan(&mut self, users: usize) -> WorkloadResult<Vec<UserAction>> {
        if users > 0 && self.names.is_empty() {
            return Err(WorkloadError::NotSeeded);
        }
        let p = self.config.write_probability;
        Ok((0..users)
            .map(|_| {
                let name = self.names[self.rng.gen_range(0..self.names.len())].clone();
                UserAction::choose(&mut self.rng, name, p)
            })
            .collect())
    }

    /// Launch `users` concurrent users on random seeded records and wait for
    /// all of them.
    ///
    /// A failing user is logged and counted; it never cancels the others.
    pub async fn simulate_users(&mut self, users: usize) -> WorkloadResult<UserStats> {
        let actions = self.plan(users)?;
        info!(users, "simulating users start");

        let mut tasks = JoinSet::new();
        for action in actions {
            let store = self.store.clone();
            tasks.spawn(async move { action.perform(&store).await });
        }

        let mut stats = UserStats {
            users,
            ..Default::default()
        };
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(outcome)) => stats.record(outcome),
                Ok(Err(e)) => {
                    warn!(error = %e, "simulated user failed");
                    stats.record_failure();
                }
                Err(e) => {
                    warn!(error = %e, "simulated user task failed");
                    stats.record_failure();
                }
            }
        }

        info!(
            users,
            reads = stats.reads,
            writes = stats.writes,
            failures = stats.failures,
            "simulating users complete"
        );
        Ok(stats)
    }

    /// Read every seeded name back through the guarded store.
    pub async fn verify(&self) -> WorkloadResult<Verification> {
        let mut tasks = JoinSet::new();
        for name in &self.names {
            let store = self.store.clone();
            let name = name.clone();
            tasks.spawn(async move {
                let found = store.get(&name).await;
                (name, found)
            });
        }

        let mut verification = Verification::default();
        while let Some(joined) = tasks.join_next().await {
            let (name, found) = joined?;
            match found? {
                Some(record) => verification.records.push(record),
                None => verification.missing.push(name),
            }
        }
        verification
            .records
            .sort_by(|a, b| a.name().cmp(b.name()));
        verification.missing.sort();
        Ok(verification)
    }

    /// Seed, simulate the configured users, then verify.
    pub async fn run(&mut self) -> WorkloadResult<RunReport> {
        let run_id = Uuid::now_v7();
        let span = info_span!("run", %run_id);
        self.run_phases(run_id).instrument(span).await
    }

    async fn run_phases(&mut self, run_id: Uuid) -> WorkloadResult<RunReport> {
        let started_at = Utc::now();
        let clock = Instant::now();

        let seeded = self.seed(self.config.records).await?;
        let users = self.simulate_users(self.config.users).await?;
        let verification = self.verify().await?;

        let report = RunReport {
            run_id,
            started_at,
            elapsed_ms: clock.elapsed().as_millis() as u64,
            seeded,
            users,
            missing: verification.missing,
            records: verification.records,
        };
        if report.is_clean() {
            info!(elapsed_ms = report.elapsed_ms, "run complete");
        } else {
            warn!(
                failures = report.users.failures,
                missing = report.missing.len(),
                "run complete with problems"
            );
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use rwfs_guard::{GuardConfig, GuardError, GlobalLock, LatencyConfig, SimulatedLatency};
    use rwfs_store::{InMemoryStore, Store, StoreError, StoreResult};

    use super::*;

    fn guarded() -> (GuardedStore, Arc<InMemoryStore>, rwfs_guard::InterruptHandle) {
        let store = Arc::new(InMemoryStore::new());
        let (guard, handle) = GuardedStore::from_config(store.clone(), &GuardConfig::default()).unwrap();
        (guard, store, handle)
    }

    fn driver(config: WorkloadConfig) -> (WorkloadDriver, Arc<InMemoryStore>) {
        let (guard, store, _) = guarded();
        (WorkloadDriver::new(guard, config).unwrap(), store)
    }

    struct DownStore;

    impl Store for DownStore {
        fn find_by_name(&self, _name: &str) -> StoreResult<Option<Record>> {
            Err(StoreError::Unavailable("down".into()))
        }
        fn upsert(&self, _record: &Record) -> StoreResult<()> {
            Err(StoreError::Unavailable("down".into()))
        }
        fn delete_by_name(&self, _name: &str) -> StoreResult<bool> {
            Err(StoreError::Unavailable("down".into()))
        }
    }

    #[test]
    fn names_follow_sequence() {
        assert_eq!(record_names(3), vec!["file_0", "file_1", "file_2"]);
        assert!(record_names(0).is_empty());
    }

    #[test]
    fn invalid_config_rejected() {
        let (guard, _, _) = guarded();
        let config = WorkloadConfig { write_probability: 2.0, ..Default::default() };
        assert!(matches!(
            WorkloadDriver::new(guard, config),
            Err(WorkloadError::InvalidConfig(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn seed_saves_every_record() {
        let (mut d, store) = driver(WorkloadConfig::default());
        assert_eq!(d.seed(4).await.unwrap(), 4);

        assert_eq!(store.names().unwrap(), record_names(4));
        for name in record_names(4) {
            assert_eq!(store.find_by_name(&name).unwrap().unwrap().content(), "Random: ");
        }
        assert_eq!(d.names(), record_names(4).as_slice());
    }

    #[tokio::test(start_paused = true)]
    async fn seed_failure_is_fatal_after_joining_all() {
        let latency = SimulatedLatency::new(&LatencyConfig { min_ms: 1, max_ms: 2 }).unwrap();
        let guard = GuardedStore::new(
            Arc::new(DownStore),
            Arc::new(GlobalLock::new()),
            Arc::new(latency),
        );
        let mut d = WorkloadDriver::new(guard, WorkloadConfig::default()).unwrap();

        let err = d.seed(3).await.unwrap_err();
        match err {
            WorkloadError::Seed { failed, total, source } => {
                assert_eq!((failed, total), (3, 3));
                assert!(matches!(
                    *source,
                    WorkloadError::Guard(GuardError::Store(StoreError::Unavailable(_)))
                ));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(d.names().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn users_need_seeded_records() {
        let (mut d, _) = driver(WorkloadConfig::default());
        assert!(matches!(d.simulate_users(5).await, Err(WorkloadError::NotSeeded)));
        assert_eq!(d.simulate_users(0).await.unwrap(), UserStats::default());
    }

    #[tokio::test(start_paused = true)]
    async fn simulate_user_hits_seeded_record() {
        let (mut d, _) = driver(WorkloadConfig::default());
        d.seed(1).await.unwrap();
        let outcome = d.simulate_user("file_0").await.unwrap();
        assert!(matches!(
            outcome,
            UserOutcome::Read { hit: true } | UserOutcome::Write { hit: true }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn write_only_users_change_content() {
        let config = WorkloadConfig { write_probability: 1.0, ..Default::default() };
        let (mut d, store) = driver(config);
        d.seed(1).await.unwrap();

        let stats = d.simulate_users(3).await.unwrap();
        assert_eq!((stats.writes, stats.write_hits, stats.reads), (3, 3, 0));

        let content = store.find_by_name("file_0").unwrap().unwrap().content().to_string();
        assert_ne!(content, "Random: ");
        content.parse::<i32>().expect("written content is an integer");
    }

    #[tokio::test(start_paused = true)]
    async fn read_only_users_leave_content() {
        let config = WorkloadConfig { write_probability: 0.0, ..Default::default() };
        let (mut d, store) = driver(config);
        d.seed(2).await.unwrap();

        let stats = d.simulate_users(20).await.unwrap();
        assert_eq!((stats.reads, stats.read_hits, stats.writes), (20, 20, 0));
        for name in record_names(2) {
            assert_eq!(store.find_by_name(&name).unwrap().unwrap().content(), "Random: ");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn seeded_plans_are_reproducible() {
        let config = WorkloadConfig { rng_seed: Some(7), ..Default::default() };
        let (mut a, _) = driver(config.clone());
        let (mut b, _) = driver(config);
        a.seed(10).await.unwrap();
        b.seed(10).await.unwrap();

        let plan = a.plan(50).unwrap();
        assert_eq!(plan, b.plan(50).unwrap());
        assert!(plan.iter().all(|act| a.names().iter().any(|n| n == act.target())));
    }

    #[tokio::test(start_paused = true)]
    async fn seeded_single_users_are_reproducible() {
        let config = WorkloadConfig { rng_seed: Some(7), ..Default::default() };
        let mut runs = Vec::new();
        for _ in 0..2 {
            let (mut d, store) = driver(config.clone());
            d.seed(1).await.unwrap();
            let mut history = Vec::new();
            for _ in 0..16 {
                let outcome = d.simulate_user("file_0").await.unwrap();
                let content = store.find_by_name("file_0").unwrap().unwrap().content().to_string();
                history.push((outcome, content));
            }
            runs.push(history);
        }
        assert_eq!(runs[0], runs[1]);
    }

    #[tokio::test(start_paused = true)]
    async fn failing_users_do_not_stop_the_others() {
        let (guard, _, handle) = guarded();
        let mut d = WorkloadDriver::new(guard, WorkloadConfig::default()).unwrap();
        d.seed(3).await.unwrap();

        let users = tokio::spawn(async move { d.simulate_users(40).await });
        // Enough time for some users to finish, far too little for all.
        tokio::time::sleep(Duration::from_secs(2)).await;
        handle.interrupt();

        let stats = users.await.unwrap().unwrap();
        assert_eq!(stats.users, 40);
        assert!(stats.failures > 0);
        assert!(stats.reads + stats.writes > 0);
        assert_eq!(stats.reads + stats.writes + stats.failures, 40);
    }

    #[tokio::test(start_paused = true)]
    async fn hundred_users_over_ten_records() {
        let (mut d, store) = driver(WorkloadConfig::default());

        let report = tokio::time::timeout(Duration::from_secs(120), d.run())
            .await
            .expect("run finished within budget")
            .unwrap();

        assert_eq!(report.seeded, 10);
        assert_eq!(report.users.users, 100);
        assert_eq!(report.users.reads + report.users.writes, 100);
        assert_eq!(report.users.read_hits, report.users.reads);
        assert_eq!(report.users.write_hits, report.users.writes);
        assert!(report.is_clean());
        assert_eq!(report.records.len(), 10);
        assert_eq!(store.names().unwrap(), record_names(10));
    }

    #[tokio::test(start_paused = true)]
    async fn verify_lists_missing_records() {
        let (mut d, _) = driver(WorkloadConfig::default());
        d.seed(3).await.unwrap();
        d.store.delete("file_1").await.unwrap();

        let v = d.verify().await.unwrap();
        assert_eq!(v.missing, vec!["file_1"]);
        let names: Vec<&str> = v.records.iter().map(Record::name).collect();
        assert_eq!(names, vec!["file_0", "file_2"]);
    }
}
