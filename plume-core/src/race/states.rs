use super::forced::{force_completion, project_remaining};
use super::frame::{RaceFrame, RacePhase};
use super::notice::{NoticeSink, RaceNotice};
use super::RaceSettings;
use crate::config::constants::{LEAD_CHANGE_SPACING_MS, REQUIRED_FINISHERS};
use crate::core::{EntrantId, TimeOfDay, WagerError};
use crate::entrant::Roster;
use crate::events::{
    apply_pre_race_modifiers, check_chain_reactions, generate_pre_race_events, ActiveEvent,
    EventEngine, PreRaceEvents,
};
use crate::rng::{RaceRandom, RandomSource};
use crossbeam::channel::Receiver;
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

/// Wall clock in milliseconds since the epoch
pub(crate) fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

// ============================================================================
// Race Data (shared by all states)
// ============================================================================

/// Everything a race owns, whatever its state
#[derive(Debug, Clone)]
pub(crate) struct RaceData {
    pub(crate) settings: RaceSettings,
    pub(crate) roster: Roster,
    pub(crate) pre_race: PreRaceEvents,
    pub(crate) events: EventEngine,
    pub(crate) rng: RandomSource,
    pub(crate) notices: NoticeSink,
    /// Epoch milliseconds at which the roster was drawn
    pub(crate) created_at_ms: u64,
}

impl RaceData {
    fn clear_transient(&mut self) {
        self.roster.reset_race_state();
        self.events.clear();
    }

    fn frame(&self, phase: RacePhase, clock_ms: f64, countdown: Option<u32>) -> RaceFrame {
        RaceFrame::capture(
            phase,
            clock_ms,
            countdown,
            &self.roster,
            &self.events,
            &self.pre_race,
        )
    }
}

// ============================================================================
// State: Waiting
// ============================================================================

/// Race drawn and open for bets
///
/// **Valid Transitions:**
/// - `start_countdown()` → RaceCounting
/// - `start_countdown_synchronized()` → RaceCounting
#[derive(Debug, Clone)]
pub struct RaceWaiting {
    pub(crate) data: RaceData,
}

impl RaceWaiting {
    /// Draw a roster and its pre-race conditions from `rng`
    ///
    /// Conditions are folded into the attributes before this returns.
    pub fn new(settings: RaceSettings, time_of_day: Option<TimeOfDay>, mut rng: RandomSource) -> Self {
        let mut roster = Roster::initialize(time_of_day, &mut rng);
        let mut pre_race = generate_pre_race_events(&roster, &mut rng);
        apply_pre_race_modifiers(&mut pre_race, &mut roster);

        info!(
            seeded = rng.is_seeded(),
            time_of_day = ?time_of_day,
            conditions = pre_race.len(),
            "Race drawn"
        );

        Self {
            data: RaceData {
                settings,
                roster,
                pre_race,
                events: EventEngine::new(),
                rng,
                notices: NoticeSink::default(),
                created_at_ms: epoch_millis(),
            },
        }
    }

    /// Synchronized race from a seed
    pub fn seeded(settings: RaceSettings, time_of_day: Option<TimeOfDay>, seed: u64) -> Self {
        Self::new(settings, time_of_day, RandomSource::seeded(seed))
    }

    /// Offline race from OS entropy
    pub fn offline(settings: RaceSettings, time_of_day: Option<TimeOfDay>) -> Self {
        Self::new(settings, time_of_day, RandomSource::system())
    }

    pub(crate) fn from_data(data: RaceData) -> Self {
        Self { data }
    }

    pub fn roster(&self) -> &Roster {
        &self.data.roster
    }

    pub fn pre_race_events(&self) -> &PreRaceEvents {
        &self.data.pre_race
    }

    pub fn odds_table(&self) -> BTreeMap<EntrantId, u32> {
        self.data.roster.odds_table()
    }

    pub fn settings(&self) -> &RaceSettings {
        &self.data.settings
    }

    /// Current generator state, `None` offline
    pub fn seed(&self) -> Option<u64> {
        self.data.rng.seed()
    }

    /// Attach a bounded notice channel; replaces any earlier listener
    pub fn subscribe(&mut self) -> Receiver<RaceNotice> {
        let (sink, receiver) = NoticeSink::channel(self.data.settings.notice_capacity);
        self.data.notices = sink;
        receiver
    }

    pub fn frame(&self) -> RaceFrame {
        self.data.frame(RacePhase::Waiting, 0.0, None)
    }

    /// Transition: Waiting → Counting, start stamped from the local clock
    pub fn start_countdown(self) -> RaceCounting {
        let remaining = self.data.settings.countdown_ticks;
        RaceCounting {
            data: self.data,
            remaining,
            synchronized_start_ms: None,
        }
    }

    /// Transition: Waiting → Counting, start stamped with a shared timestamp
    pub fn start_countdown_synchronized(self, start_ms: u64) -> RaceCounting {
        let remaining = self.data.settings.countdown_ticks;
        RaceCounting {
            data: self.data,
            remaining,
            synchronized_start_ms: Some(start_ms),
        }
    }

    pub fn reset(self) -> RaceWaiting {
        self
    }
}

// ============================================================================
// State: Counting
// ============================================================================

/// Countdown before the start
///
/// **Valid Transitions:**
/// - `tick()` → RaceCounting, or RaceRacing once the countdown reaches zero
/// - `start_now()` → RaceRacing
/// - `reset()` → RaceWaiting
#[derive(Debug, Clone)]
pub struct RaceCounting {
    data: RaceData,
    remaining: u32,
    synchronized_start_ms: Option<u64>,
}

/// Result of one countdown tick
#[derive(Debug)]
pub enum CountdownResult {
    Counting(RaceCounting),
    Started(RaceRacing),
}

impl CountdownResult {
    pub fn is_started(&self) -> bool {
        matches!(self, CountdownResult::Started(_))
    }
}

impl RaceCounting {
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn roster(&self) -> &Roster {
        &self.data.roster
    }

    pub fn frame(&self) -> RaceFrame {
        self.data.frame(RacePhase::Counting, 0.0, Some(self.remaining))
    }

    /// One countdown step; the last step starts the race
    pub fn tick(mut self, now_ms: u64) -> CountdownResult {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            CountdownResult::Started(self.start_now(now_ms))
        } else {
            debug!(remaining = self.remaining, "Countdown");
            CountdownResult::Counting(self)
        }
    }

    /// Transition: Counting → Racing
    ///
    /// A synchronized start timestamp, when present, wins over `now_ms`.
    pub fn start_now(mut self, now_ms: u64) -> RaceRacing {
        let start_ms = self.synchronized_start_ms.unwrap_or(now_ms);
        self.data.clear_transient();
        self.data.notices.emit(RaceNotice::RaceStarted);
        info!(start_ms, "Race started");
        RaceRacing {
            data: self.data,
            start_ms,
            clock_ms: 0.0,
            finish_seq: 0,
            ticks: 0,
            winner_announced: false,
            leader: None,
            last_lead_notice_ms: None,
        }
    }

    pub fn reset(mut self) -> RaceWaiting {
        self.data.clear_transient();
        RaceWaiting::from_data(self.data)
    }
}

// ============================================================================
// State: Racing
// ============================================================================

/// Race in progress
///
/// **Valid Transitions:**
/// - `tick()` → RaceRacing, or RaceFinished once settled
/// - `reset()` → RaceWaiting
#[derive(Debug, Clone)]
pub struct RaceRacing {
    data: RaceData,
    start_ms: u64,
    clock_ms: f64,
    finish_seq: u32,
    ticks: u64,
    winner_announced: bool,
    leader: Option<EntrantId>,
    last_lead_notice_ms: Option<f64>,
}

/// Result of one racing tick
#[derive(Debug)]
pub enum TickResult {
    Running(RaceRacing),
    Finished(RaceFinished),
}

impl TickResult {
    pub fn is_finished(&self) -> bool {
        matches!(self, TickResult::Finished(_))
    }
}

impl RaceRacing {
    pub fn roster(&self) -> &Roster {
        &self.data.roster
    }

    pub fn start_ms(&self) -> u64 {
        self.start_ms
    }

    /// Race clock in milliseconds
    pub fn elapsed_ms(&self) -> f64 {
        self.clock_ms
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn active_events(&self) -> impl Iterator<Item = &ActiveEvent> {
        self.data.events.iter()
    }

    pub fn frame(&self) -> RaceFrame {
        self.data.frame(RacePhase::Racing, self.clock_ms, None)
    }

    /// Advance the race to wall-clock time `now_ms`
    pub fn tick(mut self, now_ms: u64) -> TickResult {
        let elapsed = now_ms.saturating_sub(self.start_ms) as f64;
        let dt = (elapsed - self.clock_ms).max(0.0);
        self.clock_ms = self.clock_ms.max(elapsed);
        self.ticks += 1;

        let clock = self.clock_ms;
        let race_length = self.data.settings.race_length_ms;

        self.data.events.expire(clock);
        self.roll_incidents(clock);
        self.roll_chain_reactions(clock);
        self.step_physics(dt, clock, race_length);

        let forced = force_completion(
            &mut self.data.roster,
            clock,
            race_length,
            &self.data.settings.forced,
            &mut self.finish_seq,
        );
        if !forced.is_empty() {
            debug!(count = forced.len(), clock, "Forced completion");
            self.announce_winner();
        }

        self.track_leader(clock);

        if self.data.roster.finished_count() >= REQUIRED_FINISHERS || clock >= race_length {
            TickResult::Finished(self.finish())
        } else {
            TickResult::Running(self)
        }
    }

    fn roll_incidents(&mut self, clock: f64) {
        let data = &mut self.data;
        for idx in 0..data.roster.len() {
            let Some(entrant) = data.roster.as_slice().get(idx) else {
                continue;
            };
            let Some(event) = data.events.check_for_event(entrant, clock, &mut data.rng) else {
                continue;
            };
            if let Some(e) = data.roster.get_mut(event.entrant) {
                e.nudge(event.position_delta(e.event_severity()));
            }
            debug!(entrant = %event.entrant, kind = event.kind.label(), propelled = event.propelled, clock, "Incident");
            data.notices.emit(RaceNotice::Incident {
                entrant: event.entrant,
                kind: event.kind,
            });
        }
    }

    fn roll_chain_reactions(&mut self, clock: f64) {
        let data = &mut self.data;
        let reactions =
            check_chain_reactions(&data.events, &data.roster, &data.settings.chain, &mut data.rng);
        for reaction in reactions {
            let Some(event) =
                data.events
                    .start_chained(reaction.entrant, reaction.kind, reaction.source, clock)
            else {
                continue;
            };
            if let Some(e) = data.roster.get_mut(event.entrant) {
                e.nudge(event.position_delta(e.event_severity()));
            }
            debug!(entrant = %reaction.entrant, source = %reaction.source, kind = reaction.kind.label(), clock, "Chain reaction");
            data.notices.emit(RaceNotice::ChainReaction {
                entrant: reaction.entrant,
                kind: reaction.kind,
                source: reaction.source,
            });
        }
    }

    fn step_physics(&mut self, dt: f64, clock: f64, race_length: f64) {
        let data = &mut self.data;
        let mut crossed = false;
        for e in data.roster.iter_mut() {
            if e.is_finished() {
                continue;
            }
            let noise = data.rng.next();
            let multiplier = data
                .events
                .active(e.id)
                .map(|ev| ev.speed_multiplier(e.event_severity()))
                .unwrap_or(1.0);
            if e.advance(dt, race_length, noise, multiplier) {
                e.mark_finished(clock.min(race_length), self.finish_seq, false);
                self.finish_seq += 1;
                crossed = true;
                debug!(entrant = %e.id, clock, "Crossed the line");
            }
        }
        if crossed {
            self.announce_winner();
        }
    }

    /// Fire the winner notice once, for the earliest recorded finisher
    fn announce_winner(&mut self) {
        if self.winner_announced {
            return;
        }
        let first = self
            .data
            .roster
            .iter()
            .filter_map(|e| e.progress.finish_seq.filter(|_| e.is_finished()).map(|s| (s, e.id)))
            .min();
        if let Some((_, id)) = first {
            self.winner_announced = true;
            self.data.notices.emit(RaceNotice::Winner { entrant: id });
        }
    }

    fn track_leader(&mut self, clock: f64) {
        let leader = self.data.roster.leader();
        if leader == self.leader {
            return;
        }
        let spaced = self
            .last_lead_notice_ms
            .map_or(true, |last| clock - last >= LEAD_CHANGE_SPACING_MS);
        if let (Some(_), Some(new_leader)) = (self.leader, leader) {
            if spaced {
                self.data
                    .notices
                    .emit(RaceNotice::LeadChange { leader: new_leader });
                self.last_lead_notice_ms = Some(clock);
            }
        }
        self.leader = leader;
    }

    /// Transition: Racing → Finished
    fn finish(mut self) -> RaceFinished {
        let settings = &self.data.settings;
        project_remaining(
            &mut self.data.roster,
            settings.race_length_ms,
            settings.forced.synthetic_time_spread_ms,
            &mut self.finish_seq,
            false,
        );
        let order = self.data.roster.assign_finish_positions();
        self.announce_winner();

        info!(
            winner = ?order.first(),
            elapsed_ms = self.clock_ms,
            ticks = self.ticks,
            "Race finished"
        );

        RaceFinished {
            data: self.data,
            order,
            elapsed_ms: self.clock_ms,
        }
    }

    pub fn reset(mut self) -> RaceWaiting {
        self.data.clear_transient();
        RaceWaiting::from_data(self.data)
    }
}

// ============================================================================
// State: Finished
// ============================================================================

/// Race over; every entrant is ranked
///
/// **Valid Transitions:**
/// - `reset()` → RaceWaiting (same roster)
/// - `next_race()` → RaceWaiting (fresh roster from the continuing stream)
#[derive(Debug, Clone)]
pub struct RaceFinished {
    data: RaceData,
    order: Vec<EntrantId>,
    elapsed_ms: f64,
}

impl RaceFinished {
    pub fn roster(&self) -> &Roster {
        &self.data.roster
    }

    /// Every entrant, best rank first
    pub fn finish_order(&self) -> &[EntrantId] {
        &self.order
    }

    pub fn winner(&self) -> Option<EntrantId> {
        self.order.first().copied()
    }

    pub fn odds_table(&self) -> BTreeMap<EntrantId, u32> {
        self.data.roster.odds_table()
    }

    pub fn pre_race_events(&self) -> &PreRaceEvents {
        &self.data.pre_race
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn frame(&self) -> RaceFrame {
        self.data.frame(RacePhase::Finished, self.elapsed_ms, None)
    }

    /// Current generator state, `None` offline
    pub fn seed(&self) -> Option<u64> {
        self.data.rng.seed()
    }

    pub fn reset(mut self) -> RaceWaiting {
        self.data.clear_transient();
        RaceWaiting::from_data(self.data)
    }

    /// Draw the next race from the same stream
    ///
    /// Keeps the settings and any attached listener.
    pub fn next_race(self, time_of_day: Option<TimeOfDay>) -> RaceWaiting {
        let RaceData {
            settings,
            rng,
            notices,
            ..
        } = self.data;
        let mut next = RaceWaiting::new(settings, time_of_day, rng);
        next.data.notices = notices;
        next
    }
}

// ============================================================================
// Enum wrapper
// ============================================================================

/// Type-erased race state for hosts that drive a race from a frame loop
///
/// **Note:** Using this enum gives up compile-time state guarantees.
#[derive(Debug, Clone)]
pub enum Race {
    Waiting(RaceWaiting),
    Counting(RaceCounting),
    Racing(RaceRacing),
    Finished(RaceFinished),
}

impl Race {
    pub fn phase(&self) -> RacePhase {
        match self {
            Race::Waiting(_) => RacePhase::Waiting,
            Race::Counting(_) => RacePhase::Counting,
            Race::Racing(_) => RacePhase::Racing,
            Race::Finished(_) => RacePhase::Finished,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, Race::Finished(_))
    }

    /// The waiting race to bet on; betting closes once the countdown starts
    pub fn open_for_betting(&self) -> Result<&RaceWaiting, WagerError> {
        match self {
            Race::Waiting(r) => Ok(r),
            _ => Err(WagerError::BettingClosed),
        }
    }

    pub fn roster(&self) -> &Roster {
        match self {
            Race::Waiting(r) => r.roster(),
            Race::Counting(r) => r.roster(),
            Race::Racing(r) => r.roster(),
            Race::Finished(r) => r.roster(),
        }
    }

    pub fn frame(&self) -> RaceFrame {
        match self {
            Race::Waiting(r) => r.frame(),
            Race::Counting(r) => r.frame(),
            Race::Racing(r) => r.frame(),
            Race::Finished(r) => r.frame(),
        }
    }

    /// Drive whichever state the race is in; waiting and finished races
    /// are returned unchanged
    pub fn tick(self, now_ms: u64) -> Race {
        match self {
            Race::Counting(r) => match r.tick(now_ms) {
                CountdownResult::Counting(c) => c.into(),
                CountdownResult::Started(s) => s.into(),
            },
            Race::Racing(r) => match r.tick(now_ms) {
                TickResult::Running(r) => r.into(),
                TickResult::Finished(f) => f.into(),
            },
            other => other,
        }
    }

    pub fn reset(self) -> RaceWaiting {
        match self {
            Race::Waiting(r) => r.reset(),
            Race::Counting(r) => r.reset(),
            Race::Racing(r) => r.reset(),
            Race::Finished(r) => r.reset(),
        }
    }
}

impl From<RaceWaiting> for Race {
    fn from(r: RaceWaiting) -> Self {
        Race::Waiting(r)
    }
}

impl From<RaceCounting> for Race {
    fn from(r: RaceCounting) -> Self {
        Race::Counting(r)
    }
}

impl From<RaceRacing> for Race {
    fn from(r: RaceRacing) -> Self {
        Race::Racing(r)
    }
}

impl From<RaceFinished> for Race {
    fn from(r: RaceFinished) -> Self {
        Race::Finished(r)
    }
}
