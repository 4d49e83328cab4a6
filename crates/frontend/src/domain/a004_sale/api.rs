use contracts::domain::a004_sale::aggregate::{CreateSaleDto, Sale, SaleListFilter, UpdateSaleDto};
use contracts::domain::common::PaginationMeta;

use crate::shared::api_utils::{decode_page, get_value, get_json, send_json, with_query, Verb};

const BASE: &str = "/api/sales";

pub async fn create_sale(dto: &CreateSaleDto) -> Result<Sale, String> {
    send_json(Verb::Post, BASE, dto, "create sale").await
}

pub async fn fetch_sales(filter: &SaleListFilter) -> Result<(Vec<Sale>, Option<PaginationMeta>), String> {
    filter.validate()?;
    let path = with_query(BASE, filter)?;
    decode_page(get_value(&path, "fetch sales").await?)
}

pub async fn fetch_sale(id: &str) -> Result<Sale, String> {
    get_json(&format!("{}/{}", BASE, id), "fetch sale").await
}

pub async fn update_sale(id: &str, dto: &UpdateSaleDto) -> Result<Sale, String> {
    send_json(Verb::Put, &format!("{}/{}", BASE, id), dto, "update sale").await
}
