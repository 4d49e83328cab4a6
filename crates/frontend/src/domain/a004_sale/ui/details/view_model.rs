use crate::domain::a004_sale::api;
use contracts::domain::a004_sale::aggregate::{PaymentStatus, Sale, SaleStatus, UpdateSaleDto};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Текущий статус и статусы, в которые из него можно перейти
pub fn status_choices(current: SaleStatus) -> Vec<SaleStatus> {
    SaleStatus::all()
        .into_iter()
        .filter(|s| *s == current || current.can_transition_to(*s))
        .collect()
}

#[derive(Clone, Copy)]
pub struct SaleDetailsViewModel {
    pub id: StoredValue<String>,
    pub sale: RwSignal<Option<Sale>>,
    pub status: RwSignal<SaleStatus>,
    pub payment_status: RwSignal<PaymentStatus>,
    pub error: RwSignal<Option<String>>,
    pub loading: RwSignal<bool>,
    pub saving: RwSignal<bool>,
}

impl SaleDetailsViewModel {
    pub fn new(id: String) -> Self {
        Self {
            id: StoredValue::new(id),
            sale: RwSignal::new(None),
            status: RwSignal::new(SaleStatus::default()),
            payment_status: RwSignal::new(PaymentStatus::default()),
            error: RwSignal::new(None),
            loading: RwSignal::new(false),
            saving: RwSignal::new(false),
        }
    }

    fn apply(&self, sale: Sale) {
        self.status.set(sale.status);
        self.payment_status.set(sale.payment_status);
        self.sale.set(Some(sale));
    }

    pub fn load(&self) {
        let this = *self;
        let id = this.id.get_value();
        this.loading.set(true);
        spawn_local(async move {
            match api::fetch_sale(&id).await {
                Ok(sale) => {
                    this.apply(sale);
                    this.error.set(None);
                }
                Err(e) => this.error.set(Some(format!("Ошибка загрузки продажи: {}", e))),
            }
            this.loading.set(false);
        });
    }

    /// Есть несохранённые изменения статусов
    pub fn is_dirty(&self) -> bool {
        self.sale.with(|s| {
            s.as_ref().is_some_and(|sale| {
                sale.status != self.status.get() || sale.payment_status != self.payment_status.get()
            })
        })
    }

    pub fn save_command(&self) {
        let Some(sale) = self.sale.get_untracked() else {
            return;
        };
        let status = self.status.get_untracked();
        let payment_status = self.payment_status.get_untracked();
        let dto = UpdateSaleDto {
            status: (status != sale.status).then_some(status),
            payment_status: (payment_status != sale.payment_status).then_some(payment_status),
            notes: None,
        };
        if let Err(msg) = dto.validate_for(&sale) {
            self.error.set(Some(msg));
            return;
        }

        let this = *self;
        this.saving.set(true);
        this.error.set(None);
        spawn_local(async move {
            match api::update_sale(&sale.id, &dto).await {
                Ok(updated) => {
                    log::info!("Sale {} updated: status={}", updated.id, updated.status.as_str());
                    this.apply(updated);
                }
                Err(e) => this.error.set(Some(format!("Не удалось обновить продажу: {}", e))),
            }
            this.saving.set(false);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_choices() {
        assert_eq!(
            status_choices(SaleStatus::Pending),
            vec![SaleStatus::Completed, SaleStatus::Pending, SaleStatus::Cancelled]
        );
        assert_eq!(status_choices(SaleStatus::Cancelled), vec![SaleStatus::Cancelled]);
        assert!(status_choices(SaleStatus::Completed).contains(&SaleStatus::Returned));
        assert!(!status_choices(SaleStatus::Returned).contains(&SaleStatus::Completed));
    }
}
