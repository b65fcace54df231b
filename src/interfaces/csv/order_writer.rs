use crate::domain::order::{OrderRecord, OrderStatus};
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OrderRow<'a> {
    gateway_order_id: &'a str,
    amount: u64,
    currency: &'a str,
    status: OrderStatus,
    payment_id: Option<&'a str>,
}

impl<'a> From<&'a OrderRecord> for OrderRow<'a> {
    fn from(order: &'a OrderRecord) -> Self {
        Self {
            gateway_order_id: order.gateway_order_id(),
            amount: order.amount(),
            currency: order.currency(),
            status: order.status(),
            payment_id: order.payment_id(),
        }
    }
}

const HEADER: [&str; 5] = ["gatewayOrderId", "amount", "currency", "status", "paymentId"];

/// Writes order records as CSV.
///
/// Columns follow the persisted field names; `paymentId` is empty until the
/// order is paid.
pub struct OrderWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> OrderWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::WriterBuilder::new().from_writer(sink),
        }
    }

    pub fn write_orders<I>(&mut self, orders: I) -> Result<()>
    where
        I: IntoIterator<Item = OrderRecord>,
    {
        let mut wrote_any = false;
        for order in orders {
            self.writer.serialize(OrderRow::from(&order))?;
            wrote_any = true;
        }
        // serialize() only emits the header alongside the first row
        if !wrote_any {
            self.writer.write_record(HEADER)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::MinorAmount;

    fn render(orders: Vec<OrderRecord>) -> String {
        let mut buf = Vec::new();
        OrderWriter::new(&mut buf).write_orders(orders).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_writes_header_and_rows() {
        let created = OrderRecord::created("order_1", MinorAmount::new(50_000).unwrap(), "INR");
        let mut paid = OrderRecord::created("order_2", MinorAmount::new(10_000).unwrap(), "INR");
        paid.mark_paid("pay_1");

        let output = render(vec![created, paid]);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "gatewayOrderId,amount,currency,status,paymentId");
        assert_eq!(lines[1], "order_1,50000,INR,created,");
        assert_eq!(lines[2], "order_2,10000,INR,paid,pay_1");
    }

    #[test]
    fn test_empty_collection_still_has_header() {
        assert_eq!(
            render(Vec::new()),
            "gatewayOrderId,amount,currency,status,paymentId\n"
        );
    }
}
