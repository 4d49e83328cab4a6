//! Счёт по продаже. Собирается на клиенте из продажи и профиля компании;
//! печать и PDF сюда не относятся.

use serde::{Deserialize, Serialize};

use crate::domain::a004_sale::aggregate::{PaymentMethod, PaymentStatus, Sale};
use crate::domain::a007_business_profile::aggregate::BusinessProfile;

/// Строка счёта
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLine {
    pub position: usize,
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub discount_percent: f64,
    pub line_total: f64,
}

/// Реквизиты продавца на счёте
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSeller {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub tax_id: Option<String>,
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDocument {
    pub number: String,
    pub issued_at: Option<String>,
    pub seller: InvoiceSeller,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub lines: Vec<InvoiceLine>,
    pub subtotal: f64,
    pub discount: f64,
    pub tax: f64,
    pub tax_rate_percent: f64,
    pub total: f64,
    pub currency: String,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub notes: Option<String>,
}

impl InvoiceDocument {
    /// Собрать счёт. Номер берётся из продажи, иначе строится из префикса
    /// профиля и начала ID продажи.
    pub fn from_sale(sale: &Sale, profile: &BusinessProfile) -> Self {
        let number = sale
            .invoice_number
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| invoice_number_for(&profile.invoice_prefix, &sale.id));

        let lines = sale
            .items
            .iter()
            .enumerate()
            .map(|(idx, item)| InvoiceLine {
                position: idx + 1,
                description: item.product_name.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                discount_percent: item.discount_percent,
                line_total: item.line_total(),
            })
            .collect();

        Self {
            number,
            issued_at: sale.created_at.clone(),
            seller: InvoiceSeller {
                name: profile.business_name.clone(),
                address: profile.address.clone(),
                phone: profile.phone.clone(),
                email: profile.email.clone(),
                tax_id: profile.tax_id.clone(),
                logo_url: profile.logo_url.clone(),
            },
            customer_name: sale.customer_name.clone(),
            customer_phone: sale.customer_phone.clone(),
            lines,
            subtotal: sale.subtotal,
            discount: sale.discount,
            tax: sale.tax,
            tax_rate_percent: sale.tax_rate_percent(),
            total: sale.total,
            currency: profile.currency.clone(),
            payment_method: sale.payment_method,
            payment_status: sale.payment_status,
            notes: sale.notes.clone(),
        }
    }

    /// Сумма строк совпадает с подытогом продажи
    pub fn lines_match_subtotal(&self) -> bool {
        let sum: f64 = self.lines.iter().map(|l| l.line_total).sum();
        (sum - self.subtotal).abs() < 0.01
    }
}

/// `{PREFIX}-{первые 8 символов ID}` в верхнем регистре
pub fn invoice_number_for(prefix: &str, sale_id: &str) -> String {
    let head: String = sale_id.chars().filter(|c| c.is_ascii_alphanumeric()).take(8).collect();
    let prefix = if prefix.trim().is_empty() { "INV" } else { prefix.trim() };
    format!("{}-{}", prefix, head).to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sale(invoice_number: Option<&str>) -> Sale {
        serde_json::from_value(json!({
            "id": "65a1b2c3-d4e5",
            "invoiceNumber": invoice_number,
            "storeId": "s1",
            "customerName": "Ann Lee",
            "items": [
                {"productId": "p1", "productName": "Keyboard", "quantity": 2, "unitPrice": 35.5},
                {"productId": "p2", "productName": "Mouse", "quantity": 1, "unitPrice": 50, "discountPercent": 10}
            ],
            "subtotal": 116.0, "discountAmount": 16.0, "tax": 10.0, "total": 110.0,
            "paymentMethod": "card",
            "createdAt": "2024-06-01T12:00:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn test_from_sale() {
        let profile = BusinessProfile {
            business_name: "Corner Shop".into(),
            invoice_prefix: "cs".into(),
            currency: "USD".into(),
            ..BusinessProfile::default()
        };

        let doc = InvoiceDocument::from_sale(&sale(None), &profile);
        assert_eq!(doc.number, "CS-65A1B2C3");
        assert_eq!(doc.lines.len(), 2);
        assert_eq!(doc.lines[1].position, 2);
        assert_eq!(doc.lines[1].line_total, 45.0);
        assert!(doc.lines_match_subtotal());
        assert_eq!(doc.tax_rate_percent, 10.0);
        assert_eq!(doc.seller.name, "Corner Shop");
        assert_eq!(doc.payment_method, PaymentMethod::Card);

        let doc = InvoiceDocument::from_sale(&sale(Some("INV-0042")), &profile);
        assert_eq!(doc.number, "INV-0042");
    }

    #[test]
    fn test_default_prefix() {
        assert_eq!(invoice_number_for("", "abc"), "INV-ABC");
    }
}
