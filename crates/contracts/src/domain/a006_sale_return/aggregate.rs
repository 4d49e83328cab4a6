use serde::{Deserialize, Serialize};

use crate::domain::a004_sale::aggregate::Sale;
use crate::shared::money::{percent_of, round_money};
use crate::shared::validation::required;

/// Как считается сумма возврата по строке
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum RefundMode {
    /// Процент от суммы возвращаемых единиц
    Percentage(f64),
    /// Фиксированная сумма, не больше суммы строки
    Fixed(f64),
}

impl Default for RefundMode {
    fn default() -> Self {
        RefundMode::Percentage(100.0)
    }
}

/// Строка черновика возврата
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnLine {
    pub product_id: String,
    pub product_name: String,
    pub sold_quantity: f64,
    pub quantity: f64,
    /// Цена единицы с учётом скидки по строке продажи
    pub unit_price: f64,
    pub refund_mode: RefundMode,
}

impl ReturnLine {
    pub fn line_total(&self) -> f64 {
        round_money(self.quantity * self.unit_price)
    }

    pub fn refund_amount(&self) -> f64 {
        let line_total = self.line_total();
        match self.refund_mode {
            RefundMode::Percentage(p) => percent_of(line_total, p),
            RefundMode::Fixed(amount) => round_money(amount.clamp(0.0, line_total.max(0.0))),
        }
    }

    pub fn is_selected(&self) -> bool {
        self.quantity > 0.0
    }
}

/// Черновик возврата по продаже
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReturnDraft {
    pub sale_id: String,
    pub store_id: String,
    pub reason: String,
    pub lines: Vec<ReturnLine>,
}

impl ReturnDraft {
    /// Все позиции продажи с нулевым количеством к возврату
    pub fn from_sale(sale: &Sale) -> Self {
        Self {
            sale_id: sale.id.clone(),
            store_id: sale.store_id.clone(),
            reason: String::new(),
            lines: sale
                .items
                .iter()
                .map(|item| ReturnLine {
                    product_id: item.product_id.clone(),
                    product_name: item.product_name.clone(),
                    sold_quantity: item.quantity,
                    quantity: 0.0,
                    unit_price: item.effective_unit_price(),
                    refund_mode: RefundMode::default(),
                })
                .collect(),
        }
    }

    pub fn total_refund(&self) -> f64 {
        round_money(self.lines.iter().map(ReturnLine::refund_amount).sum())
    }

    /// Возвращаются все единицы всех позиций
    pub fn is_full_return(&self) -> bool {
        self.lines.iter().all(|l| (l.quantity - l.sold_quantity).abs() < f64::EPSILON)
    }

    /// Валидация данных
    pub fn validate(&self) -> Result<(), String> {
        required(&self.sale_id, "Продажа")?;
        required(&self.reason, "Причина возврата")?;
        if !self.lines.iter().any(ReturnLine::is_selected) {
            return Err("Выберите хотя бы одну позицию для возврата".into());
        }
        for line in &self.lines {
            if line.quantity < 0.0 || line.quantity > line.sold_quantity {
                return Err(format!(
                    "Количество для \"{}\" должно быть от 0 до {}",
                    line.product_name, line.sold_quantity
                ));
            }
            match line.refund_mode {
                RefundMode::Percentage(p) if !(0.0..=100.0).contains(&p) => {
                    return Err("Процент возврата должен быть от 0 до 100".into());
                }
                RefundMode::Fixed(a) if a < 0.0 => {
                    return Err("Сумма возврата не может быть отрицательной".into());
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// Позиция запроса на возврат
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnItemDto {
    pub product_id: String,
    pub product_name: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub refund_mode: RefundMode,
    pub refund_amount: f64,
}

/// Запрос на создание возврата
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReturnDto {
    pub sale_id: String,
    pub store_id: String,
    pub reason: String,
    pub items: Vec<ReturnItemDto>,
    pub total_refund: f64,
}

impl CreateReturnDto {
    /// Только выбранные строки, суммы посчитаны на клиенте
    pub fn from_draft(draft: &ReturnDraft) -> Self {
        let items = draft
            .lines
            .iter()
            .filter(|l| l.is_selected())
            .map(|l| ReturnItemDto {
                product_id: l.product_id.clone(),
                product_name: l.product_name.clone(),
                quantity: l.quantity,
                unit_price: l.unit_price,
                refund_mode: l.refund_mode,
                refund_amount: l.refund_amount(),
            })
            .collect();

        Self {
            sale_id: draft.sale_id.clone(),
            store_id: draft.store_id.clone(),
            reason: draft.reason.trim().to_string(),
            items,
            total_refund: draft.total_refund(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sale() -> Sale {
        serde_json::from_value(json!({
            "id": "sale-1",
            "storeId": "s1",
            "items": [
                {"productId": "p1", "productName": "Keyboard", "quantity": 2, "unitPrice": 35.5},
                {"productId": "p2", "productName": "Mouse", "quantity": 1, "unitPrice": 50, "discountPercent": 10}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_refund_modes() {
        let mut draft = ReturnDraft::from_sale(&sale());
        assert_eq!(draft.lines[1].unit_price, 45.0);

        draft.lines[0].quantity = 1.0;
        draft.lines[0].refund_mode = RefundMode::Percentage(50.0);
        assert_eq!(draft.lines[0].refund_amount(), 17.75);

        draft.lines[1].quantity = 1.0;
        draft.lines[1].refund_mode = RefundMode::Fixed(60.0);
        assert_eq!(draft.lines[1].refund_amount(), 45.0);

        assert_eq!(draft.total_refund(), 62.75);
        assert!(!draft.is_full_return());
    }

    #[test]
    fn test_validation() {
        let mut draft = ReturnDraft::from_sale(&sale());
        draft.reason = "Damaged".into();
        assert!(draft.validate().is_err());

        draft.lines[0].quantity = 3.0;
        assert!(draft.validate().is_err());

        draft.lines[0].quantity = 2.0;
        draft.lines[0].refund_mode = RefundMode::Percentage(101.0);
        assert!(draft.validate().is_err());

        draft.lines[0].refund_mode = RefundMode::default();
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_dto_contains_selected_lines_only() {
        let mut draft = ReturnDraft::from_sale(&sale());
        draft.reason = " Wrong item ".into();
        draft.lines[1].quantity = 1.0;

        let dto = CreateReturnDto::from_draft(&draft);
        assert_eq!(dto.items.len(), 1);
        assert_eq!(dto.items[0].product_id, "p2");
        assert_eq!(dto.total_refund, 45.0);
        assert_eq!(dto.reason, "Wrong item");

        let value = serde_json::to_value(&dto).unwrap();
        assert_eq!(value["items"][0]["refundMode"], json!({"type": "percentage", "value": 100.0}));
    }
}
