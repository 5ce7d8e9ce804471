//! HTML fragments written into the result container.
//!
//! Every interpolated value goes through [`escape`], so values without markup
//! characters appear verbatim in the output.

use std::fmt::Display;

use crate::error::LookupError;
use crate::model::{ErrorPayload, Item, OrderRecord};

pub const NOT_ENTERED: &str = "ID not entered";

pub const INPUT_ID: &str = "orderIdInput";
pub const BUTTON_ID: &str = "findButton";
pub const RESULT_ID: &str = "result";

pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn field(out: &mut String, label: &str, value: impl Display) {
    out.push_str("<p>");
    out.push_str(label);
    out.push_str(": ");
    out.push_str(&escape(&value.to_string()));
    out.push_str("</p>\n");
}

pub fn not_entered() -> String {
    NOT_ENTERED.to_string()
}

fn item(out: &mut String, item: &Item) {
    out.push_str("<div class=\"item\">\n<h3>Item:</h3>\n");
    field(out, "Chart ID", item.chrt_id);
    field(out, "Price", item.price);
    field(out, "RID", &item.rid);
    field(out, "Sale", item.sale);
    field(out, "Size", &item.size);
    field(out, "Total price", item.total_price);
    field(out, "NM ID", item.nm_id);
    field(out, "Brand", &item.brand);
    field(out, "Status", item.status);
    out.push_str("</div>\n");
}

pub fn order(order: &OrderRecord) -> String {
    let mut out = String::from("<h1> Order info </h1>\n");
    field(&mut out, "Order_id", &order.order_uid);
    field(&mut out, "Track_number", &order.track_number);
    field(&mut out, "Entry", &order.entry);

    let delivery = &order.delivery;
    out.push_str("<div class=\"delivery\">\n<h2>Delivery</h2>\n");
    field(&mut out, "Name", &delivery.name);
    field(&mut out, "Phone", &delivery.phone);
    field(&mut out, "Zip", &delivery.zip);
    field(&mut out, "City", &delivery.city);
    field(&mut out, "Address", &delivery.address);
    field(&mut out, "Region", &delivery.region);
    field(&mut out, "Email", &delivery.email);
    out.push_str("</div>\n");

    let payment = &order.payment;
    out.push_str("<div class=\"payment\">\n<h2>Payment</h2>\n");
    field(&mut out, "Transaction", &payment.transaction);
    field(&mut out, "Request ID", &payment.request_id);
    field(&mut out, "Currency", &payment.currency);
    field(&mut out, "Provider", &payment.provider);
    field(&mut out, "Amount", payment.amount);
    field(&mut out, "Payment dt", payment.payment_dt);
    field(&mut out, "Bank", &payment.bank);
    field(&mut out, "Delivery cost", payment.delivery_cost);
    field(&mut out, "Goods total", payment.goods_total);
    field(&mut out, "Custom fee", payment.custom_fee);
    out.push_str("</div>\n");

    out.push_str("<div class=\"items\">\n<h2>Items</h2>\n");
    for entry in order.items.iter().flatten() {
        item(&mut out, entry);
    }
    out.push_str("</div>\n");

    field(&mut out, "Locale", &order.locale);
    field(&mut out, "Internal signature", &order.internal_signature);
    field(&mut out, "Customer ID", &order.customer_id);
    field(&mut out, "Delivery service", &order.delivery_service);
    field(&mut out, "ShardKey", &order.shardkey);
    field(&mut out, "SM ID", order.sm_id);
    field(&mut out, "Date Created", &order.date_created);
    field(&mut out, "Oof shard", &order.oof_shard);
    out
}

pub fn error(payload: &ErrorPayload) -> String {
    let mut out = String::from("<h1> Error </h1>\n");
    field(&mut out, "Code", &payload.code);
    field(&mut out, "Message", &payload.msg);
    out
}

/// Shown when the lookup produced nothing the error branch could display.
pub fn failure(err: &LookupError) -> String {
    let message = match err.status() {
        Some(status) => format!("unreadable response from order service (status {status})"),
        None => "order service unavailable".to_string(),
    };

    let mut out = String::from("<h1> Error </h1>\n");
    field(&mut out, "Message", message);
    out
}

/// Full document hosting the input, the trigger and the result container.
/// `result_html` is inserted as-is.
pub fn page(input_value: &str, result_html: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Order lookup</title>
</head>
<body>
<form method="get" action="/">
<input type="text" id="{INPUT_ID}" name="order_id" value="{}">
<button type="submit" id="{BUTTON_ID}">Find</button>
</form>
<div id="{RESULT_ID}">
{result_html}
</div>
</body>
</html>
"#,
        escape(input_value)
    )
}
