//! Capture tasks
//!
//! IMU: fetch, read the four groups into one [`MotionRecord`], publish it
//! on the motion channel, yield. A failed fetch or group read discards the
//! iteration. Publishing waits while the channel is full.
//!
//! Audio: take a pool slot (waiting while the pool is empty), read one PCM
//! block straight into its audio region and queue it on the frame FIFO. A
//! failed read drops the slot back into the pool.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Channel;
use embedded_hal_async::delay::DelayNs;

use super::frame::{FrameWriter, FRAME_SIZE};
use super::pool::{BufferPool, PoolBuffer};
use super::record::MotionRecord;
use crate::devices::audio::{AudioError, AudioSource};
use crate::devices::traits::{SensorChannel, SensorDevice, SensorError};
use crate::parameters::{AudioParams, ImuParams};

/// Motion channel depth: one record in flight plus one buffered
pub const MOTION_CHANNEL_DEPTH: usize = 2;

/// Motion records from the IMU task to the transmit task
pub type MotionChannel<M> = Channel<M, MotionRecord, MOTION_CHANNEL_DEPTH>;

/// Pool of frame-sized slots
pub type FramePool<M, const N: usize> = BufferPool<M, N, FRAME_SIZE>;

/// One frame slot
pub type FrameBuffer<'a, M, const N: usize> = PoolBuffer<'a, M, N, FRAME_SIZE>;

/// Filled frames from the audio task to the transmit task
///
/// Sized to the pool so queuing never waits longer than acquiring did.
pub type FrameFifo<'a, M, const N: usize> = Channel<M, FrameBuffer<'a, M, N>, N>;

/// One IMU capture iteration
///
/// Returns the published record.
pub async fn capture_motion_once<M: RawMutex, S: SensorDevice>(
    sensor: &mut S,
    motion: &MotionChannel<M>,
) -> Result<MotionRecord, SensorError> {
    sensor
        .sample_fetch(SensorChannel::All)
        .await
        .inspect_err(|e| crate::log_error!("IMU sample fetch failed: {:?}", e))?;

    let record = MotionRecord::capture(sensor).map_err(|(channel, e)| {
        crate::log_error!("could not get {:?} data: {:?}", channel, e);
        e
    })?;

    motion.send(record).await;
    Ok(record)
}

/// IMU capture task body
pub async fn run_imu_capture<M: RawMutex, S: SensorDevice, D: DelayNs>(
    mut sensor: S,
    motion: &MotionChannel<M>,
    mut delay: D,
    params: ImuParams,
) -> ! {
    crate::log_info!("IMU capture started");
    loop {
        // Errors are logged; the next iteration retries
        let _ = capture_motion_once(&mut sensor, motion).await;
        delay.delay_us(params.capture_yield_us).await;
    }
}

/// Configure and start the microphone stream
pub async fn start_audio<A: AudioSource>(
    mic: &mut A,
    params: &AudioParams,
) -> Result<(), AudioError> {
    mic.configure(params).await.inspect_err(|e| {
        crate::log_error!("Microphone configuration failed: {:?}", e);
    })?;
    mic.start().await.inspect_err(|e| {
        crate::log_error!("Microphone start failed: {:?}", e);
    })?;
    crate::log_info!(
        "Microphone started: {} Hz, {} bit, {} ch",
        params.sample_rate_hz,
        params.sample_bits,
        params.channels
    );
    Ok(())
}

/// One audio capture iteration
///
/// Returns the number of audio bytes read into the queued frame.
pub async fn capture_audio_once<'p, M: RawMutex, A: AudioSource, const N: usize>(
    mic: &mut A,
    pool: &'p FramePool<M, N>,
    fifo: &FrameFifo<'p, M, N>,
) -> Result<usize, AudioError> {
    let mut buf = pool.acquire().await;

    let mut frame = FrameWriter::new(&mut buf);
    let audio = frame.audio_mut();
    let n = mic.read_block(audio).await.inspect_err(|e| {
        crate::log_error!("Microphone read failed: {:?}", e);
    })?;
    if n < audio.len() {
        crate::log_debug!("Short audio block: {} bytes", n);
        audio[n..].fill(0);
    }

    fifo.send(buf).await;
    Ok(n)
}

/// Audio capture task body
///
/// Starts the stream once; returns only if that fails.
pub async fn run_audio_capture<'p, M: RawMutex, A: AudioSource, const N: usize>(
    mut mic: A,
    pool: &'p FramePool<M, N>,
    fifo: &FrameFifo<'p, M, N>,
    params: AudioParams,
) -> Result<(), AudioError> {
    start_audio(&mut mic, &params).await?;
    loop {
        // A failed read has already released its slot
        let _ = capture_audio_once(&mut mic, pool, fifo).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::traits::ChannelReading;
    use crate::platform::mock::MockMic;
    use embassy_futures::select::{select, Either};
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
    use nalgebra::{Quaternion, Vector3};

    type Raw = CriticalSectionRawMutex;

    /// Sensor whose fetch or one group can be made to fail
    #[derive(Default)]
    struct ScriptedSensor {
        fetches: usize,
        fail_fetch: bool,
        missing: Option<SensorChannel>,
    }

    impl SensorDevice for ScriptedSensor {
        async fn sample_fetch(&mut self, _channel: SensorChannel) -> Result<(), SensorError> {
            self.fetches += 1;
            if self.fail_fetch {
                return Err(SensorError::Hub);
            }
            Ok(())
        }

        fn channel_get(&self, channel: SensorChannel) -> Result<ChannelReading, SensorError> {
            if self.missing == Some(channel) {
                return Err(SensorError::NoData);
            }
            let t = self.fetches as f32;
            Ok(match channel {
                SensorChannel::RotationVecIjkr => {
                    ChannelReading::ijkr(&Quaternion::new(1.0, 0.0, 0.0, t))
                }
                _ => ChannelReading::vector(&Vector3::new(t, t, t)),
            })
        }
    }

    #[tokio::test]
    async fn test_motion_record_published() {
        let motion = MotionChannel::<Raw>::new();
        let mut sensor = ScriptedSensor::default();

        let record = capture_motion_once(&mut sensor, &motion).await.unwrap();
        assert_eq!(record.quaternion, [0.0, 0.0, 1.0, 1.0]);
        assert_eq!(motion.try_receive().ok(), Some(record));
    }

    #[tokio::test]
    async fn test_failed_group_publishes_nothing() {
        let motion = MotionChannel::<Raw>::new();
        let mut sensor = ScriptedSensor {
            missing: Some(SensorChannel::MagnXyz),
            ..ScriptedSensor::default()
        };

        assert_eq!(
            capture_motion_once(&mut sensor, &motion).await,
            Err(SensorError::NoData)
        );
        assert!(motion.is_empty());
    }

    #[tokio::test]
    async fn test_failed_fetch_publishes_nothing() {
        let motion = MotionChannel::<Raw>::new();
        let mut sensor = ScriptedSensor {
            fail_fetch: true,
            ..ScriptedSensor::default()
        };

        assert_eq!(
            capture_motion_once(&mut sensor, &motion).await,
            Err(SensorError::Hub)
        );
        assert!(motion.is_empty());
    }

    #[tokio::test]
    async fn test_full_motion_channel_applies_backpressure() {
        let motion = MotionChannel::<Raw>::new();
        let mut sensor = ScriptedSensor::default();

        for _ in 0..MOTION_CHANNEL_DEPTH {
            capture_motion_once(&mut sensor, &motion).await.unwrap();
        }
        let result = select(
            capture_motion_once(&mut sensor, &motion),
            tokio::task::yield_now(),
        )
        .await;
        assert!(matches!(result, Either::Second(())));
        assert_eq!(motion.len(), MOTION_CHANNEL_DEPTH);

        // Oldest record is still first
        assert_eq!(motion.try_receive().unwrap().accel, [1.0; 3]);
    }

    #[tokio::test]
    async fn test_start_audio_configures_once() {
        let mic = MockMic::new();
        let mut source = mic.clone();
        start_audio(&mut source, &AudioParams::default()).await.unwrap();

        assert_eq!(mic.configured(), Some(AudioParams::default()));
        assert!(mic.is_running());
        assert_eq!(mic.starts(), 1);
    }

    #[tokio::test]
    async fn test_audio_block_queued_in_frame() {
        let pool = FramePool::<Raw, 2>::new();
        let fifo = FrameFifo::<Raw, 2>::new();
        let mic = MockMic::new();
        mic.push_block(0x5A);
        let mut source = mic.clone();
        start_audio(&mut source, &AudioParams::default()).await.unwrap();

        let n = capture_audio_once(&mut source, &pool, &fifo).await.unwrap();
        assert_eq!(n, 180);
        assert_eq!(pool.available(), 1);

        let frame = fifo.try_receive().ok().unwrap();
        assert!(frame[..180].iter().all(|&b| b == 0x5A));
        drop(frame);
        assert_eq!(pool.available(), 2);
    }

    #[tokio::test]
    async fn test_audio_read_error_returns_slot() {
        let pool = FramePool::<Raw, 2>::new();
        let fifo = FrameFifo::<Raw, 2>::new();
        let mic = MockMic::new();
        mic.push_error(AudioError::Timeout);
        let mut source = mic.clone();
        start_audio(&mut source, &AudioParams::default()).await.unwrap();

        assert_eq!(
            capture_audio_once(&mut source, &pool, &fifo).await,
            Err(AudioError::Timeout)
        );
        assert_eq!(pool.available(), 2);
        assert!(fifo.is_empty());
    }

    #[tokio::test]
    async fn test_audio_capture_stops_on_start_failure() {
        let pool = FramePool::<Raw, 2>::new();
        let fifo = FrameFifo::<Raw, 2>::new();

        struct BrokenMic;

        impl AudioSource for BrokenMic {
            async fn configure(&mut self, _params: &AudioParams) -> Result<(), AudioError> {
                Err(AudioError::InvalidConfig)
            }

            async fn start(&mut self) -> Result<(), AudioError> {
                Ok(())
            }

            async fn stop(&mut self) -> Result<(), AudioError> {
                Ok(())
            }

            async fn read_block(&mut self, _dst: &mut [u8]) -> Result<usize, AudioError> {
                Ok(0)
            }
        }

        assert_eq!(
            run_audio_capture(BrokenMic, &pool, &fifo, AudioParams::default()).await,
            Err(AudioError::InvalidConfig)
        );
    }
}
