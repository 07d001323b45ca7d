use chrono::{ DateTime, Local, TimeZone };
use log::debug;
use std::fmt::Display;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{ interval, MissedTickBehavior };

pub const DEFAULT_DATE_FORMAT: &str = "%B %-d, %Y %-I:%M %p";

pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>, format: &str) -> String
    where Tz::Offset: Display
{
    date.format(format).to_string()
}

#[derive(Debug, Clone)]
pub struct ClockConfig {
    pub interval: Duration,
    pub format: String,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

/// Publishes the formatted local time once per interval until dropped.
pub struct ClockTicker {
    handle: JoinHandle<()>,
    display: watch::Receiver<String>,
}

impl ClockTicker {
    /// Must be called from within a tokio runtime. `config.interval` must be non-zero.
    pub fn start(config: ClockConfig) -> Self {
        let (tx, display) = watch::channel(format_date(&Local::now(), &config.format));

        let handle = tokio::spawn(async move {
            let mut ticker = interval(config.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; the initial value is already published.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if tx.send(format_date(&Local::now(), &config.format)).is_err() {
                    break;
                }
            }
        });
        debug!("Clock started");

        Self { handle, display }
    }

    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.display.clone()
    }

    pub fn current(&self) -> String {
        self.display.borrow().clone()
    }
}

impl Drop for ClockTicker {
    fn drop(&mut self) {
        self.handle.abort();
        debug!("Clock stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn formats_with_default_pattern() {
        let date = Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 0).unwrap();
        assert_eq!(format_date(&date, DEFAULT_DATE_FORMAT), "March 5, 2024 2:07 PM");
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_interval() {
        let ticker = ClockTicker::start(ClockConfig {
            interval: Duration::from_secs(60),
            format: "%H:%M".into(),
        });
        let mut display = ticker.subscribe();
        assert!(!ticker.current().is_empty());

        tokio::time::advance(Duration::from_secs(30)).await;
        assert!(!display.has_changed().unwrap());

        tokio::time::advance(Duration::from_secs(31)).await;
        display.changed().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_ticker_stops_the_timer() {
        let ticker = ClockTicker::start(ClockConfig::default());
        let mut display = ticker.subscribe();
        drop(ticker);

        // Sender goes away with the aborted task.
        assert!(display.changed().await.is_err());
    }
}
