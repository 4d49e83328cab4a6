use serde::{Deserialize, Serialize};

use crate::domain::common::{null_as_default, Identified};
use crate::shared::money::{is_sane_amount, percent_of, round_money};
use crate::shared::validation::required;

// ============================================================================
// Enums
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    #[default]
    Completed,
    Pending,
    Cancelled,
    PartiallyReturned,
    Returned,
}

impl SaleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaleStatus::Completed => "completed",
            SaleStatus::Pending => "pending",
            SaleStatus::Cancelled => "cancelled",
            SaleStatus::PartiallyReturned => "partially_returned",
            SaleStatus::Returned => "returned",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SaleStatus::Completed => "Завершена",
            SaleStatus::Pending => "В ожидании",
            SaleStatus::Cancelled => "Отменена",
            SaleStatus::PartiallyReturned => "Частичный возврат",
            SaleStatus::Returned => "Возврат",
        }
    }

    pub fn all() -> Vec<SaleStatus> {
        vec![
            SaleStatus::Completed,
            SaleStatus::Pending,
            SaleStatus::Cancelled,
            SaleStatus::PartiallyReturned,
            SaleStatus::Returned,
        ]
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::all().into_iter().find(|s| s.as_str() == code)
    }

    /// Допустимые переходы статуса продажи
    pub fn can_transition_to(&self, next: SaleStatus) -> bool {
        use SaleStatus::*;
        matches!(
            (self, next),
            (Pending, Completed)
                | (Pending, Cancelled)
                | (Completed, Cancelled)
                | (Completed, PartiallyReturned)
                | (Completed, Returned)
                | (PartiallyReturned, Returned)
        )
    }

    /// По продаже можно оформить возврат
    pub fn is_returnable(&self) -> bool {
        matches!(self, SaleStatus::Completed | SaleStatus::PartiallyReturned)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    BankTransfer,
    Credit,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::Credit => "credit",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Наличные",
            PaymentMethod::Card => "Карта",
            PaymentMethod::BankTransfer => "Перевод",
            PaymentMethod::Credit => "В долг",
        }
    }

    pub fn all() -> Vec<PaymentMethod> {
        vec![
            PaymentMethod::Cash,
            PaymentMethod::Card,
            PaymentMethod::BankTransfer,
            PaymentMethod::Credit,
        ]
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::all().into_iter().find(|m| m.as_str() == code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Paid,
    Pending,
    Partial,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::Pending => "pending",
            PaymentStatus::Partial => "partial",
            PaymentStatus::Refunded => "refunded",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "Оплачена",
            PaymentStatus::Pending => "Не оплачена",
            PaymentStatus::Partial => "Частично",
            PaymentStatus::Refunded => "Возвращена",
        }
    }

    pub fn all() -> Vec<PaymentStatus> {
        vec![
            PaymentStatus::Paid,
            PaymentStatus::Pending,
            PaymentStatus::Partial,
            PaymentStatus::Refunded,
        ]
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::all().into_iter().find(|s| s.as_str() == code)
    }
}

/// Скидка на весь чек
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Discount {
    #[default]
    None,
    Percent(f64),
    Fixed(f64),
}

// ============================================================================
// Line items / totals
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub product_id: String,
    pub product_name: String,
    pub quantity: f64,
    pub unit_price: f64,
    /// Скидка на строку, %
    #[serde(default)]
    pub discount_percent: f64,
}

impl SaleItem {
    pub fn new(product_id: &str, product_name: &str, quantity: f64, unit_price: f64) -> Self {
        Self {
            product_id: product_id.to_string(),
            product_name: product_name.to_string(),
            quantity,
            unit_price,
            discount_percent: 0.0,
        }
    }

    /// Цена единицы с учётом скидки по строке
    pub fn effective_unit_price(&self) -> f64 {
        self.unit_price - self.unit_price * self.discount_percent.clamp(0.0, 100.0) / 100.0
    }

    /// Сумма строки с учётом скидки по строке
    pub fn line_total(&self) -> f64 {
        round_money(self.quantity * self.effective_unit_price())
    }
}

/// Итоги чека
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleTotals {
    pub subtotal: f64,
    #[serde(rename = "discountAmount")]
    pub discount: f64,
    pub tax: f64,
    pub total: f64,
}

impl SaleTotals {
    /// Подытог по строкам, скидка на чек (не больше подытога), налог на
    /// сумму после скидки, итог. Всё округляется до копеек.
    ///
    /// Подытог вне `MAX_AMOUNT` даёт нулевые итоги; такие строки отклоняет
    /// `CreateSaleDto::validate`.
    pub fn compute(items: &[SaleItem], discount: Discount, tax_rate_percent: f64) -> Self {
        let subtotal = round_money(items.iter().map(SaleItem::line_total).sum());
        if !is_sane_amount(subtotal) {
            return Self::default();
        }
        let discount = match discount {
            Discount::None => 0.0,
            Discount::Percent(p) => percent_of(subtotal, p),
            Discount::Fixed(amount) => round_money(amount.clamp(0.0, subtotal)),
        };
        let taxable = round_money(subtotal - discount);
        let tax = percent_of(taxable, tax_rate_percent);
        Self {
            subtotal,
            discount,
            tax,
            total: round_money(taxable + tax),
        }
    }
}

// ============================================================================
// Record
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub invoice_number: Option<String>,
    #[serde(default)]
    pub store_id: String,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<SaleItem>,
    #[serde(default)]
    pub subtotal: f64,
    #[serde(default, rename = "discountAmount")]
    pub discount: f64,
    #[serde(default)]
    pub tax: f64,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub status: SaleStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Sale {
    pub fn totals(&self) -> SaleTotals {
        SaleTotals {
            subtotal: self.subtotal,
            discount: self.discount,
            tax: self.tax,
            total: self.total,
        }
    }

    /// Эффективная ставка налога, восстановленная по сохранённым итогам
    pub fn tax_rate_percent(&self) -> f64 {
        let taxable = self.subtotal - self.discount;
        if taxable <= 0.0 {
            0.0
        } else {
            round_money(self.tax / taxable * 100.0)
        }
    }
}

impl Identified for Sale {
    fn id(&self) -> &str {
        &self.id
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// DTO создания продажи; он же черновик формы ввода
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleDto {
    pub store_id: String,
    pub customer_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    pub items: Vec<SaleItem>,
    pub discount_rule: Discount,
    pub tax_rate: f64,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(flatten)]
    pub totals: SaleTotals,
}

impl CreateSaleDto {
    pub fn new_for_store(store_id: &str, tax_rate: f64) -> Self {
        Self {
            store_id: store_id.to_string(),
            tax_rate,
            ..Self::default()
        }
    }

    pub fn add_item(&mut self, item: SaleItem) {
        match self
            .items
            .iter_mut()
            .find(|i| i.product_id == item.product_id && i.unit_price == item.unit_price)
        {
            Some(existing) => existing.quantity += item.quantity,
            None => self.items.push(item),
        }
        self.recompute();
    }

    pub fn remove_item(&mut self, index: usize) {
        if index < self.items.len() {
            self.items.remove(index);
        }
        self.recompute();
    }

    pub fn set_discount(&mut self, discount: Discount) {
        self.discount_rule = discount;
        self.recompute();
    }

    /// Пересчитать итоги после любого изменения строк или скидки
    pub fn recompute(&mut self) {
        self.totals = SaleTotals::compute(&self.items, self.discount_rule, self.tax_rate);
    }

    /// Валидация данных
    pub fn validate(&self) -> Result<(), String> {
        required(&self.store_id, "Магазин")?;
        required(&self.customer_name, "Покупатель")?;
        if self.items.is_empty() {
            return Err("Добавьте хотя бы одну позицию".into());
        }
        for item in &self.items {
            required(&item.product_name, "Товар")?;
            if !(item.quantity > 0.0) {
                return Err(format!("Количество для \"{}\" должно быть больше нуля", item.product_name));
            }
            if !(item.unit_price >= 0.0) {
                return Err(format!("Цена для \"{}\" не может быть отрицательной", item.product_name));
            }
            if !is_sane_amount(item.quantity) || !is_sane_amount(item.line_total()) {
                return Err(format!("Слишком большая сумма для \"{}\"", item.product_name));
            }
        }
        let subtotal: f64 = self.items.iter().map(SaleItem::line_total).sum();
        if !is_sane_amount(subtotal) {
            return Err("Слишком большая сумма чека".into());
        }
        if self.tax_rate < 0.0 {
            return Err("Ставка налога не может быть отрицательной".into());
        }
        Ok(())
    }
}

/// Изменение продажи: только статусы и комментарий
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSaleDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<SaleStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl UpdateSaleDto {
    pub fn validate_for(&self, sale: &Sale) -> Result<(), String> {
        if let Some(next) = self.status {
            if next != sale.status && !sale.status.can_transition_to(next) {
                return Err(format!(
                    "Нельзя перевести продажу из статуса \"{}\" в \"{}\"",
                    sale.status.display_name(),
                    next.display_name()
                ));
            }
        }
        Ok(())
    }
}

/// Фильтр списка продаж; пустые поля в запрос не попадают
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleListFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<SaleStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,
    pub page: usize,
    pub limit: usize,
}

impl Default for SaleListFilter {
    fn default() -> Self {
        Self {
            store_id: None,
            customer: None,
            status: None,
            payment_status: None,
            payment_method: None,
            date_from: None,
            date_to: None,
            page: 1,
            limit: 50,
        }
    }
}

impl SaleListFilter {
    pub fn for_store(store_id: &str) -> Self {
        Self {
            store_id: Some(store_id.to_string()),
            ..Self::default()
        }
    }

    /// Период задан корректно (ISO-даты сравниваются как строки)
    pub fn validate(&self) -> Result<(), String> {
        if let (Some(from), Some(to)) = (&self.date_from, &self.date_to) {
            if !from.is_empty() && !to.is_empty() && from > to {
                return Err("Дата начала позже даты окончания".into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn items() -> Vec<SaleItem> {
        let mut discounted = SaleItem::new("p2", "Mouse", 1.0, 50.0);
        discounted.discount_percent = 10.0;
        vec![SaleItem::new("p1", "Keyboard", 2.0, 35.5), discounted]
    }

    #[test]
    fn test_totals_with_percent_discount_and_tax() {
        let totals = SaleTotals::compute(&items(), Discount::Percent(10.0), 8.0);
        assert_eq!(totals.subtotal, 116.0);
        assert_eq!(totals.discount, 11.6);
        assert_eq!(totals.tax, 8.35);
        assert_eq!(totals.total, 112.75);
    }

    #[test]
    fn test_fixed_discount_is_capped() {
        let totals = SaleTotals::compute(&items(), Discount::Fixed(500.0), 0.0);
        assert_eq!(totals.discount, 116.0);
        assert_eq!(totals.total, 0.0);

        let totals = SaleTotals::compute(&[], Discount::None, 20.0);
        assert_eq!(totals, SaleTotals::default());
    }

    #[test]
    fn test_huge_amounts_never_give_nan() {
        let huge = vec![SaleItem::new("p1", "Gold", 1e200, 1e200)];
        let totals = SaleTotals::compute(&huge, Discount::Percent(10.0), 20.0);
        assert_eq!(totals, SaleTotals::default());

        let mut dto = CreateSaleDto::new_for_store("s1", 0.0);
        dto.customer_name = "Ann".into();
        dto.add_item(SaleItem::new("p1", "Gold", 1e200, 1e200));
        assert!(!dto.totals.total.is_nan());
        assert_eq!(dto.validate(), Err("Слишком большая сумма для \"Gold\"".to_string()));

        let mut dto = CreateSaleDto::new_for_store("s1", 0.0);
        dto.customer_name = "Ann".into();
        dto.add_item(SaleItem::new("p1", "Bar", 1.0, 9e11));
        dto.add_item(SaleItem::new("p2", "Bar", 1.0, 9e11));
        assert_eq!(dto.validate(), Err("Слишком большая сумма чека".to_string()));
    }

    #[test]
    fn test_draft_merges_items_and_recomputes() {
        let mut dto = CreateSaleDto::new_for_store("s1", 0.0);
        dto.customer_name = "Walk-in".into();
        dto.add_item(SaleItem::new("p1", "Keyboard", 1.0, 35.5));
        dto.add_item(SaleItem::new("p1", "Keyboard", 1.0, 35.5));
        assert_eq!(dto.items.len(), 1);
        assert_eq!(dto.totals.total, 71.0);

        dto.set_discount(Discount::Fixed(1.0));
        assert_eq!(dto.totals.total, 70.0);

        dto.remove_item(0);
        assert_eq!(dto.totals.total, 0.0);
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_dto_serialization() {
        let mut dto = CreateSaleDto::new_for_store("s1", 5.0);
        dto.customer_name = "Ann".into();
        dto.add_item(SaleItem::new("p1", "Cable", 3.0, 10.0));
        dto.set_discount(Discount::Percent(10.0));
        assert!(dto.validate().is_ok());

        let value = serde_json::to_value(&dto).unwrap();
        assert_eq!(value["discountRule"], json!({"type": "percent", "value": 10.0}));
        assert_eq!(value["subtotal"], json!(30.0));
        assert_eq!(value["discountAmount"], json!(3.0));
        assert_eq!(value["total"], json!(28.35));
    }

    #[test]
    fn test_status_transitions() {
        assert!(SaleStatus::Pending.can_transition_to(SaleStatus::Completed));
        assert!(SaleStatus::Completed.can_transition_to(SaleStatus::PartiallyReturned));
        assert!(!SaleStatus::Returned.can_transition_to(SaleStatus::Completed));
        assert!(!SaleStatus::Cancelled.can_transition_to(SaleStatus::Pending));

        let sale: Sale = serde_json::from_value(json!({"id": "x", "status": "returned", "items": null})).unwrap();
        let dto = UpdateSaleDto {
            status: Some(SaleStatus::Completed),
            ..UpdateSaleDto::default()
        };
        assert!(dto.validate_for(&sale).is_err());
        assert!(UpdateSaleDto::default().validate_for(&sale).is_ok());
    }

    #[test]
    fn test_filter_validation() {
        let mut filter = SaleListFilter::for_store("s1");
        filter.date_from = Some("2024-05-10".into());
        filter.date_to = Some("2024-05-01".into());
        assert!(filter.validate().is_err());
        filter.date_to = Some("2024-05-31".into());
        assert!(filter.validate().is_ok());
    }

    #[test]
    fn test_tax_rate_recovered() {
        let sale: Sale = serde_json::from_value(json!({
            "id": "s", "subtotal": 100.0, "discountAmount": 20.0, "tax": 4.0, "total": 84.0
        }))
        .unwrap();
        assert_eq!(sale.tax_rate_percent(), 5.0);
    }
}
