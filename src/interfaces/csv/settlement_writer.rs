use crate::domain::fees::FeeSplit;
use crate::domain::settlement::PaymentOutcome;
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

/// One settlement line: the terminal payment outcome joined with the fee
/// split the caller computed for the same gross amount.
#[derive(Debug, Serialize, PartialEq)]
pub struct SettlementRecord {
    pub payment_id: String,
    pub success: bool,
    pub transaction_hash: Option<String>,
    pub error: Option<String>,
    pub platform_fee: Decimal,
    pub provider_amount: Decimal,
    pub total: Decimal,
}

impl SettlementRecord {
    pub fn new(outcome: PaymentOutcome, split: FeeSplit) -> Self {
        Self {
            payment_id: outcome.payment_id,
            success: outcome.success,
            transaction_hash: outcome.transaction_hash,
            error: outcome.error,
            // Normalized so trailing zeros from intermediate arithmetic do
            // not leak into the output.
            platform_fee: split.platform_fee.normalize(),
            provider_amount: split.provider_amount.normalize(),
            total: split.total.normalize(),
        }
    }
}

/// Writes settlement records to a CSV sink.
pub struct SettlementWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> SettlementWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::WriterBuilder::new().from_writer(sink),
        }
    }

    pub fn write_records(mut self, records: Vec<SettlementRecord>) -> Result<()> {
        for record in records {
            self.writer.serialize(record)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
