
use parking_lot::Mutex;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Error, Layout, OriginSource, Result, Snowflake, SnowflakeId, SnowflakeResolvable,
    StaticOrigin, SystemClock, TimeSource, deconstruct,
};

/// The lowest encodable offset above the epoch.
///
/// Timestamps below `epoch + 3` are raised to it; the values right at the
/// epoch stay reserved so an identifier can never decode to the generator's
/// own unset-watermark bookkeeping.
const EPOCH_FLOOR_OFFSET: u64 = 3;

/// Per-call overrides for [`SnowflakeGenerator::generate`].
///
/// Every field defaults to `None`, meaning "resolve from the generator":
/// the wall clock for `timestamp`, the [`OriginSource`] for `worker_id` and
/// `process_id`, and the internal counter for `sequence`.
///
/// An explicit `sequence` bypasses the collision-avoidance counter entirely —
/// it is the caller's responsibility not to mint duplicates with it.
///
/// # Example
/// ```
/// use cryoid::GenerateOptions;
///
/// let options = GenerateOptions::default().with_worker_id(7);
/// assert_eq!(options.worker_id, Some(7));
/// assert_eq!(options.timestamp, None);
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Millisecond timestamp to encode; defaults to the current time.
    pub timestamp: Option<u64>,
    /// Worker/shard id; defaults to the generator's origin source.
    pub worker_id: Option<u64>,
    /// Process id; defaults to the generator's origin source.
    pub process_id: Option<u64>,
    /// Explicit sequence value, used verbatim.
    pub sequence: Option<u64>,
}

impl GenerateOptions {
    /// Sets an explicit timestamp in milliseconds.
    pub const fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Sets an explicit worker/shard id.
    pub const fn with_worker_id(mut self, worker_id: u64) -> Self {
        self.worker_id = Some(worker_id);
        self
    }

    /// Sets an explicit process id.
    pub const fn with_process_id(mut self, process_id: u64) -> Self {
        self.process_id = Some(process_id);
        self
    }

    /// Sets an explicit sequence value.
    pub const fn with_sequence(mut self, sequence: u64) -> Self {
        self.sequence = Some(sequence);
        self
    }
}

/// Mutable generation state, exclusively owned by one generator instance and
/// only ever touched under its lock.
struct State {
    sequence: u64,
    /// Timestamp of the most recently issued identifier; `None` until the
    /// first identifier is minted.
    last_timestamp: Option<u64>,
}

/// A thread-safe Snowflake ID generator over a configurable bit layout.
///
/// Owns the epoch, the [`Layout`], default origin ids, and the mutable
/// `sequence`/watermark pair that guarantees uniqueness within a millisecond.
/// The mutable pair lives behind a [`parking_lot::Mutex`] scoped to this
/// instance: concurrent `generate` calls through one instance serialize their
/// read-modify-write, and separate instances share nothing. Uniqueness
/// across instances relies on distinct origin ids, which is the operator's
/// contract, not the algorithm's.
///
/// Generation never blocks and never sleeps; when the per-millisecond
/// sequence space is exhausted the identifier simply continues from the next
/// millisecond.
///
/// # Example
/// ```
/// use cryoid::{GenerateOptions, Layout, MILLENNIUM_EPOCH, SnowflakeGenerator};
///
/// let generator = SnowflakeGenerator::new(MILLENNIUM_EPOCH, Layout::sharded64());
///
/// let flake = generator.generate(GenerateOptions::default()).unwrap();
/// let decoded = generator.deconstruct(&flake.id).unwrap();
/// assert_eq!(decoded, flake);
/// ```
pub struct SnowflakeGenerator<C = SystemClock, O = StaticOrigin>
where
    C: TimeSource,
    O: OriginSource,
{
    epoch: u64,
    layout: Layout,
    clock: C,
    origin: O,
    state: Mutex<State>,
}

impl SnowflakeGenerator<SystemClock, StaticOrigin> {
    /// Creates a generator over the system clock with the default origin ids
    /// (worker `1`, process `0`).
    ///
    /// `epoch` is the millisecond instant all encoded timestamps are measured
    /// from. It must be recent enough that current time stays within the
    /// layout's timestamp field; otherwise every generate call fails with
    /// [`Error::EpochExhausted`].
    pub fn new(epoch: u64, layout: Layout) -> Self {
        Self::with_parts(epoch, layout, SystemClock, StaticOrigin::default())
    }
}

impl<C, O> SnowflakeGenerator<C, O>
where
    C: TimeSource,
    O: OriginSource,
{
    /// Creates a generator from explicit collaborators.
    ///
    /// Useful for supplying a mock clock in tests or a host-runtime origin
    /// source in clustered deployments.
    pub fn with_parts(epoch: u64, layout: Layout, clock: C, origin: O) -> Self {
        Self {
            epoch,
            layout,
            clock,
            origin,
            state: Mutex::new(State {
                sequence: 0,
                last_timestamp: None,
            }),
        }
    }

    /// The generator's epoch in milliseconds.
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// The generator's bit layout.
    pub const fn layout(&self) -> &Layout {
        &self.layout
    }

    /// The largest millisecond timestamp this generator can encode.
    pub const fn max_epoch(&self) -> u64 {
        self.epoch.saturating_add(self.layout.max_timestamp())
    }

    /// Generates one identifier.
    ///
    /// Resolution order: the timestamp defaults to the current time and is
    /// clamped up to `epoch + 3`; a defaulted timestamp is additionally
    /// clamped up to the watermark of the last issued identifier, so minting
    /// faster than the clock ticks (or a clock stepping backwards) cannot
    /// repeat a (timestamp, sequence) pair. Within one millisecond the
    /// sequence increments; when it wraps, the identifier rolls over into the
    /// next millisecond at sequence 0.
    ///
    /// Origin ids wider than their field are masked down with the field
    /// maximum rather than rejected; callers relying on an id round-tripping
    /// unchanged must stay within `layout().max_worker()` and
    /// `layout().max_process()`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EpochExhausted`] when the resolved timestamp no
    /// longer fits the timestamp field. A failed call leaves the generator
    /// state untouched.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn generate(&self, options: GenerateOptions) -> Result<Snowflake> {
        let requested = options.timestamp;
        let raw = match requested {
            Some(timestamp) => timestamp,
            None => self.clock.current_millis(),
        };
        let max_timestamp = self.max_epoch();

        let mut state = self.state.lock();

        let mut timestamp = raw.max(self.epoch.saturating_add(EPOCH_FLOOR_OFFSET));
        if requested.is_none() {
            if let Some(last) = state.last_timestamp {
                timestamp = timestamp.max(last);
            }
        }
        if timestamp > max_timestamp {
            return Err(Error::EpochExhausted {
                timestamp,
                max_timestamp,
            });
        }

        let sequence = match options.sequence {
            Some(sequence) => sequence,
            None => {
                if state.last_timestamp == Some(timestamp) {
                    let next = if state.sequence >= self.layout.max_sequence() {
                        0
                    } else {
                        state.sequence + 1
                    };
                    if next == 0 {
                        // Sequence space for this millisecond is exhausted;
                        // continue from the next one.
                        timestamp += 1;
                        if timestamp > max_timestamp {
                            return Err(Error::EpochExhausted {
                                timestamp,
                                max_timestamp,
                            });
                        }
                    }
                    next
                } else {
                    0
                }
            }
        };

        // All checks passed: commit the new state and release the lock
        // before the (comparatively slow) packing work.
        state.sequence = sequence;
        state.last_timestamp = Some(timestamp);
        drop(state);

        let worker_id = options
            .worker_id
            .unwrap_or_else(|| self.origin.worker_id())
            & self.layout.max_worker();
        let process_id = options
            .process_id
            .unwrap_or_else(|| self.origin.process_id())
            & self.layout.max_process();
        let sequence = sequence & self.layout.max_sequence();
        let delta = timestamp - self.epoch;

        let bits = self.layout.pack(delta, worker_id, process_id, sequence);
        let id = SnowflakeId::from_binary(&bits)?;
        let flake = deconstruct(self.epoch, &self.layout, id)?;
        debug_assert_eq!(flake.timestamp, timestamp);
        debug_assert_eq!(flake.worker_id, worker_id);
        debug_assert_eq!(flake.process_id, process_id);
        debug_assert_eq!(flake.sequence, sequence);
        Ok(flake)
    }

    /// Generates a batch of identifiers.
    ///
    /// Equivalent to `amount` single [`SnowflakeGenerator::generate`] calls.
    /// An explicit `sequence` applies to the first identifier only, and an
    /// explicit starting `timestamp` is re-anchored to the previously issued
    /// timestamp on each iteration, so a batch larger than the sequence space
    /// rolls into later milliseconds instead of repeating identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAmount`] when `amount` is zero, and propagates
    /// [`Error::EpochExhausted`] from the underlying generates.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn generate_many(
        &self,
        amount: usize,
        options: GenerateOptions,
    ) -> Result<Vec<Snowflake>> {
        if amount < 1 {
            return Err(Error::InvalidAmount { amount });
        }
        let mut options = options;
        let mut flakes = Vec::with_capacity(amount);
        for _ in 0..amount {
            let flake = self.generate(options)?;
            options.sequence = None;
            if options.timestamp.is_some() {
                options.timestamp = Some(flake.timestamp);
            }
            flakes.push(flake);
        }
        Ok(flakes)
    }

    /// Deconstructs an identifier with this generator's epoch and layout.
    ///
    /// # Errors
    ///
    /// See [`deconstruct`].
    pub fn deconstruct<R>(&self, id: R) -> Result<Snowflake>
    where
        R: SnowflakeResolvable,
    {
        deconstruct(self.epoch, &self.layout, id)
    }
}
