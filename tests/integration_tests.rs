//! Integration tests for the logging pipeline
//!
//! These tests verify:
//! - FIFO delivery for lines that fit in the queue
//! - Drop-newest behaviour when the queue is full
//! - Producers never wait on a slow output
//! - Shutdown drains exactly once and nothing is written afterwards
//! - Write failures stay inside the writer thread
//! - File outputs and serde configuration

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use parking_lot::Mutex;
use rust_console_logger::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::io::{self, Write};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn len(&self) -> usize {
        self.0.lock().len()
    }

    fn lines(&self) -> Vec<String> {
        String::from_utf8(self.0.lock().clone())
            .expect("log output is utf-8")
            .lines()
            .map(str::to_owned)
            .collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Message part of a plain `[HH:MM:SS.mmm] [LEVEL] message` line
fn message_of(line: &str) -> &str {
    let rest = line.split_once("] [").expect("timestamp bracket").1;
    rest.split_once("] ").expect("level bracket").1
}

fn capturing_logger(builder: LoggerBuilder) -> (Logger, SharedBuffer) {
    let output = SharedBuffer::default();
    let logger = builder
        .output(output.clone())
        .fatal_exit_code(None)
        .build()
        .expect("Failed to build logger");
    (logger, output)
}

#[test]
fn test_fifo_within_capacity() {
    let (logger, output) = capturing_logger(Logger::builder());

    for i in 0..1000 {
        logger.info_fmt(format_args!("entry {}", i));
    }
    logger.flush().expect("Failed to flush");

    let lines = output.lines();
    assert_eq!(lines.len(), 1000);
    for (i, line) in lines.iter().enumerate() {
        assert_eq!(message_of(line), format!("entry {}", i));
    }
    assert_eq!(logger.dropped_count(), 0);
}

#[test]
fn test_fifo_per_producer_under_concurrency() {
    let (logger, output) = capturing_logger(Logger::builder().queue_capacity(1024));
    let logger = Arc::new(logger);
    let barrier = Arc::new(Barrier::new(4));

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let logger = Arc::clone(&logger);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..200 {
                    logger.info_fmt(format_args!("producer {} seq {}", t, i));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    logger.flush().expect("Failed to flush");

    let lines = output.lines();
    assert_eq!(lines.len(), 800);

    let mut next = [0usize; 4];
    for line in &lines {
        let message = message_of(line);
        let parts: Vec<&str> = message.split(' ').collect();
        assert_eq!(parts.len(), 4, "interleaved line: {:?}", line);
        let producer: usize = parts[1].parse().unwrap();
        let seq: usize = parts[3].parse().unwrap();
        assert_eq!(seq, next[producer], "out of order for producer {}", producer);
        next[producer] += 1;
    }
    assert_eq!(next, [200; 4]);
}

#[test]
fn test_paused_queue_keeps_first_admitted_lines() {
    let (logger, output) =
        capturing_logger(Logger::builder().queue_capacity(1024).start_paused());

    for i in 0..2000 {
        logger.info_fmt(format_args!("entry {}", i));
    }
    assert_eq!(logger.queue().len(), 1024);
    assert_eq!(logger.dropped_count(), 976);

    logger.start().expect("Failed to start writer");
    logger.shutdown();

    let lines = output.lines();
    assert_eq!(lines.len(), 1024);
    for (i, line) in lines.iter().enumerate() {
        assert_eq!(message_of(line), format!("entry {}", i));
    }
}

#[test]
fn test_producers_do_not_wait_on_slow_output() {
    struct SlowOutput;

    impl Write for SlowOutput {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            thread::sleep(Duration::from_millis(1));
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    let logger = Logger::builder()
        .queue_capacity(16)
        .output(SlowOutput)
        .build()
        .expect("Failed to build logger");

    // Writing all of these would take at least ten seconds.
    let start = Instant::now();
    for i in 0..10_000 {
        logger.debug_fmt(format_args!("burst {}", i));
    }
    let elapsed = start.elapsed();

    assert!(
        elapsed < Duration::from_secs(2),
        "logging blocked for {:?}",
        elapsed
    );
    assert!(logger.dropped_count() > 0);
    let metrics = logger.metrics();
    assert_eq!(metrics.total_logged() + metrics.dropped_count(), 10_000);
}

#[test]
fn test_shutdown_writes_each_line_once_and_then_nothing() {
    let (logger, output) = capturing_logger(Logger::builder());

    for i in 0..500 {
        logger.warn_fmt(format_args!("line {}", i));
    }
    logger.shutdown();
    assert_eq!(logger.state(), LifecycleState::Stopped);

    let written = output.len();
    let lines = output.lines();
    assert_eq!(lines.len(), 500);
    let unique: HashSet<&str> = lines.iter().map(|l| message_of(l)).collect();
    assert_eq!(unique.len(), 500);

    for i in 0..100 {
        logger.error_fmt(format_args!("late {}", i));
    }
    thread::sleep(Duration::from_millis(50));
    assert_eq!(output.len(), written);
    assert_eq!(logger.dropped_count(), 100);
}

#[test]
fn test_concurrent_shutdown_runs_once() {
    let (logger, output) = capturing_logger(Logger::builder());
    let logger = Arc::new(logger);

    for i in 0..300 {
        logger.info_fmt(format_args!("pending {}", i));
    }

    let barrier = Arc::new(Barrier::new(8));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let logger = Arc::clone(&logger);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                logger.shutdown();
                logger.state()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), LifecycleState::Stopped);
    }

    let lines = output.lines();
    assert_eq!(lines.len(), 300);
    assert_eq!(logger.metrics().written_count(), 300);
}

#[test]
fn test_write_failures_are_not_propagated() {
    struct FailingOutput;

    impl Write for FailingOutput {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "Simulated failure"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    let logger = Logger::builder()
        .output(FailingOutput)
        .build()
        .expect("Failed to build logger");

    for _ in 0..5 {
        logger.info("Test message");
    }
    logger.flush().expect("Flush still succeeds");

    assert_eq!(logger.metrics().write_failures(), 5);
    assert_eq!(logger.metrics().written_count(), 0);
    assert_eq!(logger.dropped_count(), 0);
}

#[test]
fn test_panicking_output_does_not_stop_writer() {
    struct PanickingOutput {
        calls: usize,
    }

    impl Write for PanickingOutput {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.calls += 1;
            if self.calls == 1 {
                panic!("output exploded");
            }
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    let logger = Logger::builder()
        .output(PanickingOutput { calls: 0 })
        .build()
        .expect("Failed to build logger");

    logger.info("first");
    logger.info("second");
    logger.flush().expect("Writer survives the panic");

    assert_eq!(logger.metrics().write_failures(), 1);
    assert_eq!(logger.metrics().written_count(), 1);
}

#[test]
fn test_panicking_flush_does_not_stop_writer() {
    struct PanickingFlush(SharedBuffer);

    impl Write for PanickingFlush {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            panic!("flush exploded");
        }
    }

    let output = SharedBuffer::default();
    let logger = Logger::builder()
        .output(PanickingFlush(output.clone()))
        .build()
        .expect("Failed to build logger");

    logger.info("one");
    for i in 0..5 {
        logger.info_fmt(format_args!("more {}", i));
    }
    logger.flush().expect("Writer survives the panic");

    assert_eq!(output.lines().len(), 6);
    assert_eq!(logger.metrics().written_count(), 6);
    assert_eq!(logger.dropped_count(), 0);
    assert!(logger.metrics().write_failures() >= 1);
}

#[test]
fn test_producers_not_blocked_by_waiting_flush_during_shutdown() {
    struct GatedOutput {
        inner: SharedBuffer,
        entered: Sender<()>,
        release: Receiver<()>,
    }

    impl Write for GatedOutput {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let _ = self.entered.try_send(());
            // Blocks until the test drops the release sender.
            let _ = self.release.recv();
            self.inner.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    let (entered_tx, entered_rx) = unbounded();
    let (release_tx, release_rx) = bounded::<()>(0);
    let output = SharedBuffer::default();
    let logger = Arc::new(
        Logger::builder()
            .queue_capacity(1)
            .output(GatedOutput {
                inner: output.clone(),
                entered: entered_tx,
                release: release_rx,
            })
            .build()
            .expect("Failed to build logger"),
    );

    logger.info("held");
    entered_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("writer picked up the first line");
    logger.info("queued");

    // Waits for a free slot while the writer is stuck.
    let flusher = {
        let logger = Arc::clone(&logger);
        thread::spawn(move || logger.flush())
    };
    thread::sleep(Duration::from_millis(50));

    let stopper = {
        let logger = Arc::clone(&logger);
        thread::spawn(move || logger.shutdown())
    };
    thread::sleep(Duration::from_millis(50));

    let (done_tx, done_rx) = bounded(1);
    let producer = {
        let logger = Arc::clone(&logger);
        thread::spawn(move || {
            logger.info("producer");
            let _ = done_tx.send(());
        })
    };
    let producer_returned = done_rx.recv_timeout(Duration::from_millis(250)).is_ok();

    drop(release_tx);
    producer.join().unwrap();
    stopper.join().unwrap();
    let flushed = flusher.join().unwrap();

    assert!(producer_returned, "producer waited on the stalled writer");
    assert!(flushed.is_ok());
    assert_eq!(logger.state(), LifecycleState::Stopped);
    let messages: Vec<String> = output
        .lines()
        .iter()
        .map(|line| message_of(line).to_owned())
        .collect();
    assert_eq!(messages, vec!["held", "queued"]);
    assert_eq!(logger.dropped_count(), 1);
}

#[test]
fn test_file_output() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("console.log");

    let file = fs::File::create(&log_file).expect("Failed to create log file");
    let logger = Logger::builder()
        .output(io::BufWriter::new(file))
        .build()
        .expect("Failed to build logger");
    assert!(!logger.colors_enabled());

    logger.info("written to a file");
    logger.error_fmt(format_args!("code {}", 500));
    logger.shutdown();

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(!content.contains('\x1b'));
    assert_eq!(message_of(lines[0]), "written to a file");
    assert_eq!(message_of(lines[1]), "code 500");
}

#[test]
fn test_set_output_redirects_to_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("redirected.log");

    let (logger, output) = capturing_logger(Logger::builder());
    logger.info("to memory");

    let file = fs::File::create(&log_file).expect("Failed to create log file");
    logger.set_output(file).expect("Failed to redirect");
    logger.info("to file");
    logger.flush().expect("Failed to flush");

    assert_eq!(output.lines().len(), 1);
    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    assert_eq!(content.lines().count(), 1);
    assert!(content.ends_with("] [INFO] to file\n"));
}

#[test]
fn test_line_layout() {
    let (logger, output) = capturing_logger(Logger::builder().clock(Clock::Utc));
    logger.error("layout check");
    logger.shutdown();

    let lines = output.lines();
    let line = lines[0].as_bytes();
    assert_eq!(line[0], b'[');
    for pos in [1, 2, 4, 5, 7, 8, 10, 11, 12] {
        assert!(line[pos].is_ascii_digit(), "position {} in {:?}", pos, lines[0]);
    }
    assert_eq!(line[3], b':');
    assert_eq!(line[6], b':');
    assert_eq!(line[9], b'.');
    assert_eq!(&lines[0][13..], "] [ERROR] layout check");
}

#[test]
fn test_config_from_json() {
    let config: LoggerConfig = serde_json::from_str(
        r#"{
            "queue_capacity": 16,
            "color": "never",
            "clock": "utc",
            "fatal_exit_code": null
        }"#,
    )
    .expect("Failed to parse config");

    assert_eq!(config.queue_capacity, 16);
    assert_eq!(config.buffer_capacity, 256);
    assert_eq!(config.color, ColorMode::Never);
    assert_eq!(config.clock, Clock::Utc);
    assert_eq!(config.fatal_exit_code, None);

    let output = SharedBuffer::default();
    let logger = LoggerBuilder::from_config(config)
        .output(output.clone())
        .build()
        .expect("Failed to build logger");
    assert_eq!(logger.queue().capacity(), 16);
    assert_eq!(logger.fatal_exit_code(), None);

    logger.fatal("configured not to exit");
    assert_eq!(logger.state(), LifecycleState::Stopped);
    assert_eq!(output.lines().len(), 1);
}

#[test]
fn test_invalid_config_is_rejected() {
    let config: LoggerConfig =
        serde_json::from_str(r#"{ "buffer_capacity": 0 }"#).expect("Failed to parse config");
    let result = LoggerBuilder::from_config(config).build();
    assert!(matches!(
        result,
        Err(LoggerError::InvalidConfiguration { .. })
    ));
}
