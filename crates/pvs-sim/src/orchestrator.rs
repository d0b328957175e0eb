//! Orchestrator: owns the live components and drives the fixed-step loop.
//!
//! Lifecycle: `Unbuilt -> build() -> Built -> start() -> Running
//! -> stop() -> Stopped -> start() -> Running`. `build()` may run again at
//! any point; it stops the bridge first and leaves the orchestrator `Built`,
//! so a tick never sees a half-replaced component set.

use crate::bridge::{BridgeStats, SourceError, TagBridge, TickReport};
use crate::error::{SimError, SimResult};
use crate::links::Links;
use crate::set::ComponentSet;
use pvs_components::{ComponentError, ProcessModel, SimComponent, build_component};
use pvs_core::io::TagWriter;
use pvs_core::{ComponentId, TickTimer};
use pvs_project::{ModelConfig, ModelKind};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Options for an orchestration session.
#[derive(Clone, Debug)]
pub struct SimOptions {
    /// Fixed time step (seconds)
    pub dt: f64,
    /// A step taking longer than `dt * overrun_factor` of wall time is an overrun
    pub overrun_factor: f64,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            dt: 0.2,
            overrun_factor: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Unbuilt,
    Built,
    Running,
    Stopped,
}

/// What one `build()` produced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BuildReport {
    pub built: usize,
    /// Records of type `None`, skipped before reaching the factory.
    pub placeholders: usize,
    pub failures: Vec<ComponentError>,
    /// Names that appeared more than once; the later record replaced the earlier one.
    pub duplicate_names: Vec<String>,
    /// Tags registered by more than one active record; the last one won.
    pub duplicate_tags: Vec<String>,
    pub unbound_mirrors: Vec<String>,
    /// Distinct tags registered with the bridge.
    pub registered: usize,
}

/// Outcome of one [`Orchestrator::step`].
#[derive(Clone, Debug, PartialEq)]
pub struct StepReport {
    /// Simulated time after this step (seconds since build)
    pub sim_time: f64,
    pub tick: TickReport,
    pub elapsed: Duration,
    pub overrun: bool,
}

/// Totals of one [`Orchestrator::run_loop`] call.
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    pub steps: u64,
    pub sim_time: f64,
    pub wall_time: Duration,
    pub overruns: u64,
    pub bridge: BridgeStats,
}

/// Cloneable handle that asks a running loop to stop at its next step.
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct Orchestrator<W> {
    models: Vec<ModelConfig>,
    options: SimOptions,
    components: ComponentSet,
    links: Links,
    bridge: TagBridge<ComponentSet, W>,
    state: RunState,
    stop: StopHandle,
    timer: TickTimer,
    sim_time: f64,
    // wall-clock forms of `dt` and the overrun budget, checked in `new`
    period: Duration,
    budget: Duration,
}

impl<W: TagWriter> Orchestrator<W> {
    pub fn new(models: Vec<ModelConfig>, writer: W, options: SimOptions) -> SimResult<Self> {
        if !(options.dt.is_finite() && options.dt > 0.0) {
            return Err(SimError::InvalidArg {
                what: "dt must be positive",
            });
        }
        if !(options.overrun_factor.is_finite() && options.overrun_factor > 0.0) {
            return Err(SimError::InvalidArg {
                what: "overrun_factor must be positive",
            });
        }
        let period = Duration::try_from_secs_f64(options.dt).map_err(|_| SimError::InvalidArg {
            what: "dt does not fit a wall-clock duration",
        })?;
        let budget = Duration::try_from_secs_f64(options.dt * options.overrun_factor).map_err(
            |_| SimError::InvalidArg {
                what: "dt * overrun_factor does not fit a wall-clock duration",
            },
        )?;
        Ok(Self {
            models,
            options,
            components: ComponentSet::new(),
            links: Links::default(),
            bridge: TagBridge::new(writer),
            state: RunState::Unbuilt,
            stop: StopHandle::default(),
            timer: TickTimer::new(),
            sim_time: 0.0,
            period,
            budget,
        })
    }

    // ---------- build & wire ----------

    /// Construct components, cache cross-wiring and register active tags.
    ///
    /// Records that fail to build are left out; the rest still build.
    pub fn build(&mut self) -> BuildReport {
        if self.bridge.is_running() {
            tracing::info!("stopping bridge to rebuild components");
        }
        self.bridge.stop();
        self.bridge.clear();
        self.components.clear();

        let mut report = BuildReport::default();

        for cfg in &self.models {
            if cfg.kind() == Some(ModelKind::None) {
                report.placeholders += 1;
                continue;
            }
            match build_component(cfg) {
                Ok(component) => {
                    if self.components.contains(&cfg.name) {
                        tracing::warn!(
                            name = %cfg.name,
                            "duplicate model name, later record wins"
                        );
                        report.duplicate_names.push(cfg.name.clone());
                    }
                    if self.components.insert(cfg.name.clone(), component).is_some() {
                        report.built += 1;
                    }
                }
                Err(err) => {
                    tracing::warn!(name = %cfg.name, error = %err, "model excluded from build");
                    report.failures.push(err);
                }
            }
        }

        self.links = Links::resolve(&self.models, &mut self.components);
        for name in &self.links.unbound_mirrors {
            tracing::warn!(%name, "sensor source not found, holding value instead");
        }
        report.unbound_mirrors = self.links.unbound_mirrors.clone();

        for cfg in self.models.iter().filter(|m| m.is_published()) {
            let Some(id) = self.components.id_of(&cfg.name) else {
                continue;
            };
            let getter = value_getter(id, cfg.name.clone());
            if self.bridge.register_source(cfg.tag.clone(), getter) {
                tracing::warn!(
                    tag = %cfg.tag,
                    name = %cfg.name,
                    "tag registered twice, last one wins"
                );
                report.duplicate_tags.push(cfg.tag.clone());
            }
        }
        report.registered = self.bridge.len();

        self.state = RunState::Built;
        self.sim_time = 0.0;
        self.timer.reset();
        tracing::info!(
            built = report.built,
            failed = report.failures.len(),
            registered = report.registered,
            "components built"
        );
        report
    }

    /// Replace the configuration and rebuild.
    pub fn rebuild(&mut self, models: Vec<ModelConfig>) -> BuildReport {
        self.models = models;
        self.build()
    }

    // ---------- run control ----------

    pub fn start(&mut self) -> SimResult<()> {
        if self.state == RunState::Unbuilt {
            return Err(SimError::NotBuilt);
        }
        self.stop.reset();
        self.bridge.start();
        self.state = RunState::Running;
        tracing::info!(dt = self.options.dt, "simulation started");
        Ok(())
    }

    pub fn stop(&mut self) {
        if self.state == RunState::Running {
            self.bridge.stop();
            self.state = RunState::Stopped;
            tracing::info!(sim_time = self.sim_time, "simulation stopped");
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Advance by the configured `dt`.
    pub fn step(&mut self) -> Option<StepReport> {
        self.step_by(self.options.dt)
    }

    /// Advance every component by `dt` and publish. `None` unless running.
    pub fn step_by(&mut self, dt: f64) -> Option<StepReport> {
        if self.stop.is_stop_requested() {
            self.stop();
        }
        if self.state != RunState::Running {
            return None;
        }
        let guard = self.timer.start();

        // all flows and drive inputs are set before any update
        self.links.apply_inputs(&mut self.components);

        for index in 0..self.components.len() {
            let Some(id) = ComponentId::from_index(index) else {
                break;
            };
            if let Some(sample) = self.links.sample_mirror(&self.components, id) {
                let sensor = self
                    .components
                    .by_id_mut(id)
                    .and_then(SimComponent::as_sensor_mut);
                if let Some(sensor) = sensor {
                    sensor.observe(sample);
                }
            }
            if let Some(component) = self.components.by_id_mut(id) {
                component.update(dt);
            }
        }
        self.sim_time += dt;

        let tick = self.bridge.tick(&self.components);

        let budget = self.budget;
        let overrun = self.timer.finish(guard, budget);
        let elapsed = self.timer.last();
        if overrun {
            tracing::warn!(?elapsed, ?budget, "step overran its time budget");
        }

        Some(StepReport {
            sim_time: self.sim_time,
            tick,
            elapsed,
            overrun,
        })
    }

    /// Blocking driver: alternate `step()` and a sleep of `dt` until stopped
    /// or until `duration` of wall time has passed.
    pub fn run_loop(&mut self, duration: Option<Duration>) -> SimResult<RunSummary> {
        self.start()?;
        let period = self.period;
        let started = Instant::now();
        let start_ticks = self.timer.count();
        let start_overruns = self.timer.overruns();

        while self.step().is_some() {
            std::thread::sleep(period);
            if duration.is_some_and(|limit| started.elapsed() >= limit) {
                break;
            }
        }
        self.stop();

        Ok(RunSummary {
            steps: self.timer.count() - start_ticks,
            sim_time: self.sim_time,
            wall_time: started.elapsed(),
            overruns: self.timer.overruns() - start_overruns,
            bridge: self.bridge.stats(),
        })
    }

    // ---------- external inputs ----------

    /// Set the drive input of a flow or temperature component.
    ///
    /// Components with a `control` link are overwritten on the next step.
    pub fn set_input(&mut self, name: &str, u: f64) -> SimResult<()> {
        let component = self.component_mut(name)?;
        if component.set_input(u) {
            Ok(())
        } else {
            Err(SimError::WrongVariant {
                name: name.to_string(),
                what: "a drive input",
            })
        }
    }

    /// Write the held value of a sensor.
    pub fn write_sensor(&mut self, name: &str, value: f64) -> SimResult<()> {
        let component = self.component_mut(name)?;
        match component.as_sensor_mut() {
            Some(sensor) => {
                sensor.write(value);
                Ok(())
            }
            None => Err(SimError::WrongVariant {
                name: name.to_string(),
                what: "written values",
            }),
        }
    }

    fn component_mut(&mut self, name: &str) -> SimResult<&mut SimComponent> {
        self.components
            .get_mut(name)
            .ok_or_else(|| SimError::UnknownComponent {
                name: name.to_string(),
            })
    }

    // ---------- accessors ----------

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn options(&self) -> &SimOptions {
        &self.options
    }

    pub fn models(&self) -> &[ModelConfig] {
        &self.models
    }

    /// Read-only view of the live components.
    pub fn components(&self) -> &ComponentSet {
        &self.components
    }

    pub fn component(&self, name: &str) -> Option<&SimComponent> {
        self.components.get(name)
    }

    pub fn values(&self) -> BTreeMap<String, f64> {
        self.components.values()
    }

    pub fn registered_tags(&self) -> Vec<&str> {
        self.bridge.tags().collect()
    }

    pub fn bridge_stats(&self) -> BridgeStats {
        self.bridge.stats()
    }

    pub fn timer(&self) -> &TickTimer {
        &self.timer
    }

    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    pub fn writer(&self) -> &W {
        self.bridge.writer()
    }

    pub fn writer_mut(&mut self) -> &mut W {
        self.bridge.writer_mut()
    }
}

fn value_getter(
    id: ComponentId,
    name: String,
) -> impl Fn(&ComponentSet) -> Result<f64, SourceError> + Send + 'static {
    move |set: &ComponentSet| set.value_at(id).ok_or_else(|| SourceError::Missing(name.clone()))
}
