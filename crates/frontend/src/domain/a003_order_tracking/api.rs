use contracts::domain::a003_order_tracking::aggregate::{
    RejectOrderDto, TrackingOrder, TrackingStep, UpdatePaymentDto,
};
use contracts::domain::common::PaginationMeta;
use serde::Serialize;

use crate::shared::api_utils::{decode_page, get_value, send_no_content, with_query, Verb};

const BASE: &str = "/api/order-tracking";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TrackingListParams<'a> {
    store_id: &'a str,
}

pub async fn fetch_tracking_orders(
    store_id: &str,
) -> Result<(Vec<TrackingOrder>, Option<PaginationMeta>), String> {
    let path = with_query(BASE, &TrackingListParams { store_id })?;
    decode_page(get_value(&path, "fetch tracking orders").await?)
}

pub async fn verify_order(id: &str) -> Result<(), String> {
    send_no_content(
        Verb::Patch,
        &format!("{}/{}/verify", BASE, id),
        &serde_json::json!({}),
        "verify order",
    )
    .await
}

pub async fn reject_order(id: &str, dto: &RejectOrderDto) -> Result<(), String> {
    dto.validate()?;
    send_no_content(Verb::Patch, &format!("{}/{}/reject", BASE, id), dto, "reject order").await
}

pub async fn update_payment(id: &str, dto: &UpdatePaymentDto) -> Result<(), String> {
    dto.validate()?;
    send_no_content(
        Verb::Patch,
        &format!("{}/{}/payment", BASE, id),
        dto,
        "update payment",
    )
    .await
}

/// Шаги подтверждения по очереди; первая ошибка прерывает цепочку
pub async fn run_verification(id: &str, steps: Vec<TrackingStep>) -> Result<(), String> {
    for step in steps {
        match step {
            TrackingStep::UpdatePayment(payment_amount) => {
                log::debug!("order {}: saving payment {} before verify", id, payment_amount);
                update_payment(id, &UpdatePaymentDto { payment_amount }).await?;
            }
            TrackingStep::Verify => verify_order(id).await?,
        }
    }
    Ok(())
}
