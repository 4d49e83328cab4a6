use contracts::domain::a006_sale_return::aggregate::{CreateReturnDto, ReturnDraft};
use serde_json::Value;

use crate::shared::api_utils::{send_json, Verb};

const BASE: &str = "/api/returns";

/// Оформить возврат; суммы по строкам посчитаны на клиенте
pub async fn create_return(draft: &ReturnDraft) -> Result<Value, String> {
    draft.validate()?;
    let dto = CreateReturnDto::from_draft(draft);
    send_json(Verb::Post, BASE, &dto, "create return").await
}
