//! Trade processor
//!
//! Routes trades into the inventory ledger one at a time and fans the
//! resulting closed trades out to a sink, an in-memory log, or neither,
//! depending on configuration.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use types::errors::{ProcessError, SinkError};
use types::trade::{ClosedTrade, Trade};

use crate::guard::{OrderingCheck, OrderingGuard};
use crate::ledger::InventoryLedger;

/// Consumer of closed trades, called synchronously in production order
pub trait ClosedTradeSink {
    fn accept(&mut self, trade: &ClosedTrade) -> Result<(), SinkError>;
}

/// Sink that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ClosedTradeSink for NullSink {
    fn accept(&mut self, _trade: &ClosedTrade) -> Result<(), SinkError> {
        Ok(())
    }
}

impl ClosedTradeSink for Vec<ClosedTrade> {
    fn accept(&mut self, trade: &ClosedTrade) -> Result<(), SinkError> {
        self.push(trade.clone());
        Ok(())
    }
}

impl<S: ClosedTradeSink + ?Sized> ClosedTradeSink for &mut S {
    fn accept(&mut self, trade: &ClosedTrade) -> Result<(), SinkError> {
        (**self).accept(trade)
    }
}

/// Configuration for the trade processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// Retain closed trades in an ordered log
    pub store: bool,
    /// Hand each closed trade to the sink as it is produced.
    /// Takes precedence over `store`: emitted trades are not also logged.
    pub emit: bool,
    /// Arrival-order checking
    pub ordering: OrderingCheck,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            store: true,
            emit: false,
            ordering: OrderingCheck::Off,
        }
    }
}

/// Single-writer front end to an inventory ledger
pub struct TradeProcessor<S: ClosedTradeSink = NullSink> {
    ledger: InventoryLedger,
    config: ProcessorConfig,
    guard: OrderingGuard,
    sink: S,
    /// Stored closed trades, production order
    closed: Vec<ClosedTrade>,
    /// Total trades processed
    trades_processed: u64,
}

impl TradeProcessor<NullSink> {
    /// Create a processor without an external sink
    pub fn new(config: ProcessorConfig) -> Self {
        Self::with_sink(config, NullSink)
    }

    /// Create a processor with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ProcessorConfig::default())
    }
}

impl<S: ClosedTradeSink> TradeProcessor<S> {
    /// Create a processor that emits into `sink`
    pub fn with_sink(config: ProcessorConfig, sink: S) -> Self {
        info!(
            store = config.store,
            emit = config.emit,
            ordering = ?config.ordering,
            "TradeProcessor initialized"
        );

        Self {
            ledger: InventoryLedger::new(),
            config,
            guard: OrderingGuard::new(),
            sink,
            closed: Vec::new(),
            trades_processed: 0,
        }
    }

    /// Process a single trade.
    ///
    /// Returns the number of closed trades it produced. With
    /// `OrderingCheck::Reject`, a trade that breaks arrival order is refused
    /// and the ledger is left untouched, as is any trade the ledger refuses
    /// for overflow. When the sink fails, every closed trade of the batch is
    /// still offered to it and the first failure is returned; the ledger has
    /// already applied the trade by then.
    pub fn process(&mut self, trade: Trade) -> Result<usize, ProcessError> {
        match self.config.ordering {
            OrderingCheck::Off => {}
            OrderingCheck::Warn => {
                if let Err(err) = self.guard.check(&trade) {
                    warn!(error = %err, "processing trade despite ordering violation");
                }
            }
            OrderingCheck::Reject => self.guard.check(&trade)?,
        }

        let seen = (self.config.ordering != OrderingCheck::Off).then(|| trade.clone());
        let closed = self.ledger.submit(trade)?;
        if let Some(seen) = seen {
            self.guard.record(&seen);
        }
        self.trades_processed += 1;

        let count = closed.len();
        let mut first_failure = None;

        for record in closed {
            if self.config.emit {
                if let Err(err) = self.sink.accept(&record) {
                    warn!(error = %err, open_time = %record.open_time, "sink rejected closed trade");
                    if first_failure.is_none() {
                        first_failure = Some(err);
                    }
                }
            } else if self.config.store {
                self.closed.push(record);
            }
        }

        match first_failure {
            Some(err) => Err(err.into()),
            None => Ok(count),
        }
    }

    /// Snapshot of the stored closed trades
    pub fn closed_trades(&self) -> Vec<ClosedTrade> {
        self.closed.clone()
    }

    /// Running realized PnL
    pub fn pnl(&self) -> Decimal {
        self.ledger.total_pnl()
    }

    pub fn ledger(&self) -> &InventoryLedger {
        &self.ledger
    }

    pub fn trades_processed(&self) -> u64 {
        self.trades_processed
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::numeric::{Price, Quantity};
    use types::side::Side;

    fn trade(time: &str, side: Side, price: u64, qty: u64) -> Trade {
        Trade::new(time, "AAPL", side, Price::from_u64(price), Quantity::from_u64(qty))
    }

    fn config(store: bool, emit: bool) -> ProcessorConfig {
        ProcessorConfig {
            store,
            emit,
            ordering: OrderingCheck::Off,
        }
    }

    #[test]
    fn test_default_config_stores() {
        let config = ProcessorConfig::default();
        assert!(config.store);
        assert!(!config.emit);
        assert_eq!(config.ordering, OrderingCheck::Off);
    }

    #[test]
    fn test_store_only() {
        let mut processor = TradeProcessor::new(config(true, false));
        processor.process(trade("1", Side::BUY, 10, 5)).unwrap();
        let count = processor.process(trade("2", Side::SELL, 12, 5)).unwrap();

        assert_eq!(count, 1);
        assert_eq!(processor.closed_trades().len(), 1);
        assert_eq!(processor.pnl(), Decimal::from(10));
        assert_eq!(processor.trades_processed(), 2);
    }

    #[test]
    fn test_emit_only() {
        let mut processor = TradeProcessor::with_sink(config(false, true), Vec::<ClosedTrade>::new());
        processor.process(trade("1", Side::BUY, 10, 5)).unwrap();
        processor.process(trade("2", Side::SELL, 12, 5)).unwrap();

        assert!(processor.closed_trades().is_empty());
        assert_eq!(processor.sink().len(), 1);
    }

    #[test]
    fn test_emit_takes_precedence_over_store() {
        let mut processor = TradeProcessor::with_sink(config(true, true), Vec::<ClosedTrade>::new());
        processor.process(trade("1", Side::BUY, 10, 5)).unwrap();
        processor.process(trade("2", Side::SELL, 12, 5)).unwrap();

        assert!(processor.closed_trades().is_empty());
        assert_eq!(processor.into_sink().len(), 1);
    }

    #[test]
    fn test_neither_still_accumulates_pnl() {
        let mut processor = TradeProcessor::with_sink(config(false, false), Vec::<ClosedTrade>::new());
        processor.process(trade("1", Side::BUY, 10, 5)).unwrap();
        processor.process(trade("2", Side::SELL, 12, 5)).unwrap();

        assert!(processor.closed_trades().is_empty());
        assert!(processor.sink().is_empty());
        assert_eq!(processor.pnl(), Decimal::from(10));
    }

    #[test]
    fn test_closed_trades_is_a_snapshot() {
        let mut processor = TradeProcessor::with_defaults();
        processor.process(trade("1", Side::BUY, 10, 5)).unwrap();
        processor.process(trade("2", Side::SELL, 12, 2)).unwrap();

        let snapshot = processor.closed_trades();
        processor.process(trade("3", Side::SELL, 12, 3)).unwrap();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(processor.closed_trades().len(), 2);
    }

    #[test]
    fn test_borrowed_sink() {
        let mut out: Vec<ClosedTrade> = Vec::new();
        {
            let mut processor = TradeProcessor::with_sink(config(false, true), &mut out);
            processor.process(trade("1", Side::SELL, 12, 5)).unwrap();
            processor.process(trade("2", Side::BUY, 10, 5)).unwrap();
        }
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].pnl, Decimal::from(10));
    }

    struct FailingSink;

    impl ClosedTradeSink for FailingSink {
        fn accept(&mut self, _trade: &ClosedTrade) -> Result<(), SinkError> {
            Err(SinkError::Closed)
        }
    }

    #[test]
    fn test_sink_failure_is_reported() {
        let mut processor = TradeProcessor::with_sink(config(false, true), FailingSink);
        processor.process(trade("1", Side::BUY, 10, 5)).unwrap();
        let err = processor.process(trade("2", Side::SELL, 12, 5)).unwrap_err();

        assert_eq!(err, ProcessError::Sink(SinkError::Closed));
        // Ledger already applied the match
        assert_eq!(processor.pnl(), Decimal::from(10));
    }

    /// Fails the first closed trade it sees, keeps the rest
    #[derive(Default)]
    struct FlakySink {
        failed: bool,
        accepted: Vec<ClosedTrade>,
    }

    impl ClosedTradeSink for FlakySink {
        fn accept(&mut self, trade: &ClosedTrade) -> Result<(), SinkError> {
            if !self.failed {
                self.failed = true;
                return Err(SinkError::Io("broken pipe".to_string()));
            }
            self.accepted.push(trade.clone());
            Ok(())
        }
    }

    #[test]
    fn test_sink_failure_does_not_drop_rest_of_batch() {
        let mut processor = TradeProcessor::with_sink(config(false, true), FlakySink::default());
        processor.process(trade("1", Side::BUY, 10, 2)).unwrap();
        processor.process(trade("2", Side::BUY, 11, 3)).unwrap();

        let err = processor.process(trade("3", Side::SELL, 12, 5)).unwrap_err();
        assert_eq!(err, ProcessError::Sink(SinkError::Io("broken pipe".to_string())));

        let sink = processor.into_sink();
        assert_eq!(sink.accepted.len(), 1);
        assert_eq!(sink.accepted[0].open_time.as_str(), "2");
    }

    #[test]
    fn test_overflow_is_refused_without_recording_tick() {
        let big = Quantity::new(Decimal::from_scientific("1e20").unwrap());
        let mut processor = TradeProcessor::new(ProcessorConfig {
            ordering: OrderingCheck::Reject,
            ..ProcessorConfig::default()
        });
        processor
            .process(Trade::new("1", "X", Side::BUY, Price::from_u64(0), big))
            .unwrap();

        let huge_price = Price::new(Decimal::from_scientific("1e10").unwrap());
        let err = processor
            .process(Trade::new("2", "X", Side::SELL, huge_price, big))
            .unwrap_err();
        assert!(matches!(err, ProcessError::Overflow { .. }));
        assert_eq!(processor.trades_processed(), 1);
        assert!(processor.closed_trades().is_empty());

        // Tick "2" was never applied, so it is still free
        let count = processor
            .process(Trade::new("2", "X", Side::SELL, Price::from_u64(1), big))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_reject_accepts_unpadded_numeric_ticks() {
        let mut processor = TradeProcessor::new(ProcessorConfig {
            ordering: OrderingCheck::Reject,
            ..ProcessorConfig::default()
        });
        processor.process(trade("9", Side::BUY, 10, 5)).unwrap();
        let count = processor.process(trade("10", Side::SELL, 12, 5)).unwrap();

        assert_eq!(count, 1);
        assert_eq!(processor.pnl(), Decimal::from(10));
    }

    #[test]
    fn test_reject_leaves_ledger_untouched() {
        let mut processor = TradeProcessor::new(ProcessorConfig {
            ordering: OrderingCheck::Reject,
            ..ProcessorConfig::default()
        });
        processor.process(trade("5", Side::BUY, 10, 5)).unwrap();

        let err = processor.process(trade("4", Side::SELL, 12, 5)).unwrap_err();
        assert!(matches!(err, ProcessError::OutOfOrder { .. }));
        assert_eq!(processor.pnl(), Decimal::ZERO);
        assert_eq!(processor.trades_processed(), 1);

        let err = processor.process(trade("5", Side::SELL, 12, 5)).unwrap_err();
        assert!(matches!(err, ProcessError::DuplicateTick { .. }));

        processor.process(trade("6", Side::SELL, 12, 5)).unwrap();
        assert_eq!(processor.pnl(), Decimal::from(10));
    }

    #[test]
    fn test_warn_processes_anyway() {
        let mut processor = TradeProcessor::new(ProcessorConfig {
            ordering: OrderingCheck::Warn,
            ..ProcessorConfig::default()
        });
        processor.process(trade("5", Side::BUY, 10, 5)).unwrap();
        let count = processor.process(trade("4", Side::SELL, 12, 5)).unwrap();

        assert_eq!(count, 1);
        assert_eq!(processor.pnl(), Decimal::from(10));
    }
}
