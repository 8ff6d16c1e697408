//! Poll loop over the configured bridges.

use tracing::{debug, error, info, warn};

use huesight_bridge_framework::{MetricRecord, Publisher};

use crate::accumulator::{Accumulator, MetricSink};
use crate::client::HueClient;
use crate::config::{BridgeTarget, HueConfig};
use crate::correlate::{Correlator, TAG_DEVICE, TAG_URL, UNDEFINED_DEVICE};
use crate::error::{CycleError, FetchError, TargetError};
use crate::resource::{Device, DevicePower, Light, LightLevel, Motion, Resource, Room, Temperature};
use crate::topology::TopologyIndex;

/// Polls every configured bridge once per interval.
pub struct HuePoller {
    config: HueConfig,
    client: HueClient,
}

impl HuePoller {
    pub fn new(config: HueConfig) -> Self {
        let client = HueClient::new(config.timeout()).with_debug(config.debug);
        Self { config, client }
    }

    /// Run the polling loop, publishing the output of every cycle.
    pub async fn run(self, publisher: Publisher) {
        let interval = self.config.poll_interval();

        info!(
            bridges = self.config.bridges.len(),
            interval_secs = self.config.poll_interval_secs,
            key_prefix = %publisher.key_prefix(),
            format = ?publisher.format(),
            "Starting Hue poller"
        );

        loop {
            let mut acc = Accumulator::new();
            match self.poll_once(&mut acc).await {
                Ok(()) => self.publish(&publisher, acc).await,
                Err(e) => error!(error = %e, "Poll cycle aborted"),
            }

            tokio::time::sleep(interval).await;
        }
    }

    /// Perform a single poll cycle over all bridges.
    ///
    /// Only an unusable bridge list fails the cycle. Everything that goes
    /// wrong while talking to a bridge is handed to the sink and the cycle
    /// moves on.
    pub async fn poll_once<S: MetricSink + ?Sized>(&self, sink: &mut S) -> Result<(), TargetError> {
        let targets = BridgeTarget::parse_all(&self.config.bridges)?;

        for target in &targets {
            self.process_bridge(target, sink).await;
        }

        Ok(())
    }

    async fn process_bridge<S: MetricSink + ?Sized>(&self, target: &BridgeTarget, sink: &mut S) {
        if self.config.debug {
            info!(bridge = %target.url, "Processing bridge");
        } else {
            debug!(bridge = %target.url, "Processing bridge");
        }

        let devices = match self.client.fetch::<Device>(target).await {
            Ok(devices) => devices,
            Err(source) => return sink.add_error(bridge_error(target, source)),
        };
        let rooms = match self.client.fetch::<Room>(target).await {
            Ok(rooms) => rooms,
            Err(source) => return sink.add_error(bridge_error(target, source)),
        };

        let topology = TopologyIndex::new(&devices, &rooms);
        let correlator = Correlator::new(&target.url, &topology, &self.config.room_assignments);

        let (lights, temperatures, light_levels, motions, device_powers) = tokio::join!(
            self.client.fetch::<Light>(target),
            self.client.fetch::<Temperature>(target),
            self.client.fetch::<LightLevel>(target),
            self.client.fetch::<Motion>(target),
            self.client.fetch::<DevicePower>(target),
        );

        let emitted = evaluate(target, lights, &mut *sink, |r, s| correlator.lights(r, s))
            + evaluate(target, temperatures, &mut *sink, |r, s| correlator.temperatures(r, s))
            + evaluate(target, light_levels, &mut *sink, |r, s| correlator.light_levels(r, s))
            + evaluate(target, motions, &mut *sink, |r, s| correlator.motions(r, s))
            + evaluate(target, device_powers, &mut *sink, |r, s| correlator.device_powers(r, s));

        debug!(
            bridge = %target.url,
            devices = topology.device_count(),
            rooms = rooms.len(),
            records = emitted,
            "Bridge processed"
        );
    }

    async fn publish(&self, publisher: &Publisher, acc: Accumulator) {
        let (records, errors) = acc.into_parts();

        let errors_key = publisher.keys().errors_key();
        for err in &errors {
            warn!(error = %err, error_type = ?err.fetch_error().error_type(), "Poll error");
            if let Err(e) = publisher.publish_json(&errors_key, &err.to_report()).await {
                warn!(error = %e, "Failed to publish error report");
            }
        }

        let keyed: Vec<(&str, &str, &MetricRecord)> = records
            .iter()
            .map(|record| {
                (
                    source_name(record.tag(TAG_URL).unwrap_or_default()),
                    record.tag(TAG_DEVICE).unwrap_or(UNDEFINED_DEVICE),
                    record,
                )
            })
            .collect();
        let stats = publisher.publish_batch(keyed).await;
        if stats.failed > 0 {
            warn!(
                failed = stats.failed,
                total = stats.total(),
                "Some records were not published"
            );
        }

        debug!(
            records = records.len(),
            errors = errors.len(),
            published = stats.success,
            failed = stats.failed,
            success_rate = stats.success_rate(),
            "Poll cycle complete"
        );
    }
}

/// Feed one fetched collection to the correlator, or record why it failed.
fn evaluate<T, S, F>(
    target: &BridgeTarget,
    fetched: Result<Vec<T>, FetchError>,
    sink: &mut S,
    correlate: F,
) -> usize
where
    T: Resource,
    S: MetricSink + ?Sized,
    F: FnOnce(&[T], &mut S) -> usize,
{
    match fetched {
        Ok(readings) => correlate(&readings, sink),
        Err(source) => {
            sink.add_error(CycleError::Resource {
                url: target.url.clone(),
                kind: T::KIND,
                source,
            });
            0
        }
    }
}

fn bridge_error(target: &BridgeTarget, source: FetchError) -> CycleError {
    CycleError::Bridge {
        url: target.url.clone(),
        source,
    }
}

/// Key segment naming a bridge: its URL without scheme or trailing slash.
pub fn source_name(url: &str) -> &str {
    url.split_once("://")
        .map_or(url, |(_, rest)| rest)
        .trim_end_matches('/')
}
