//! Shared test fixtures for integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::NaiveDate;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use usage_synth::series::SeriesParams;

/// Parameters of the reference run: 2024-11-01 to 2024-12-30, capacity 100,
/// 100 points, controlled peaks.
pub fn default_params() -> SeriesParams {
    SeriesParams::new(date(2024, 11, 1), date(2024, 12, 30), 100, 100)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub const USERS_CSV: &str = "\
computer_name,computer_sys_id,user,user_sys_id,workstation,workstation_sys_id
WS-1,c1,Ann,u1,ws-1,w1
WS-2,c2,Bo,u2,ws-2,w2
";

pub const DISCOVERY_CSV: &str = "\
discovery_model,discovery_sys_id,norm_product,norm_product_sys_id,norm_publisher,norm_publisher_sys_id,product,publisher,license_sys_id
MATLAB R2023b,d1,MATLAB,np1,MathWorks,pub1,MATLAB,The MathWorks,l1
Abaqus 2023,d2,Abaqus,np2,Dassault,pub2,Abaqus/Standard,Dassault Systemes,l2
";

pub const GROUPS_CSV: &str = "group,group_sys_id\nSimulation,g1\n";

/// Writes the users, discovery and groups tables under their default names.
pub fn write_reference_dir(dir: &Path) {
    fs::write(dir.join("user.csv"), USERS_CSV).unwrap();
    fs::write(dir.join("discovery.csv"), DISCOVERY_CSV).unwrap();
    fs::write(dir.join("group.csv"), GROUPS_CSV).unwrap();
}

/// Counts `ERROR`-level events seen while installed.
#[derive(Clone, Default)]
pub struct ErrorCounter(Arc<AtomicUsize>);

impl ErrorCounter {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl<S: Subscriber> Layer<S> for ErrorCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::ERROR {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Runs `f` with an error-counting subscriber and returns its result together
/// with the number of error events it emitted.
pub fn count_errors<T>(f: impl FnOnce() -> T) -> (T, usize) {
    let counter = ErrorCounter::default();
    let subscriber = tracing_subscriber::registry().with(counter.clone());
    let out = tracing::subscriber::with_default(subscriber, f);
    (out, counter.count())
}
