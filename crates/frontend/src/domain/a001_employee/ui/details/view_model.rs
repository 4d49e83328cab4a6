use crate::domain::a001_employee::api;
use contracts::domain::a001_employee::aggregate::{Employee, EmployeeDto};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// ViewModel формы сотрудника. Черновик живёт только здесь: список
/// обновляется после ответа сервера.
#[derive(Clone, Copy)]
pub struct EmployeeDetailsViewModel {
    pub form: RwSignal<EmployeeDto>,
    pub error: RwSignal<Option<String>>,
    pub loading: RwSignal<bool>,
    pub saving: RwSignal<bool>,
}

impl EmployeeDetailsViewModel {
    pub fn new(employee: Option<&Employee>, store_id: &str) -> Self {
        let dto = match employee {
            Some(e) => EmployeeDto::from_employee(e),
            None => EmployeeDto::new_for_store(store_id),
        };
        Self {
            form: RwSignal::new(dto),
            error: RwSignal::new(None),
            loading: RwSignal::new(false),
            saving: RwSignal::new(false),
        }
    }

    pub fn is_edit_mode(&self) -> bool {
        self.form.with(|f| f.id.is_some())
    }

    /// Перечитать сотрудника с сервера перед редактированием.
    /// Черновик заменяется, только если его ещё не меняли.
    pub fn load(&self) {
        let Some(id) = self.form.with_untracked(|f| f.id.clone()) else {
            return;
        };
        let snapshot = self.form.get_untracked();
        let form = self.form;
        let error = self.error;
        let loading = self.loading;
        loading.set(true);
        spawn_local(async move {
            match api::fetch_employee(&id).await {
                Ok(fresh) => {
                    let current = form.get_untracked();
                    if let Some(dto) = refreshed_draft(&snapshot, &current, &fresh) {
                        form.set(dto);
                    }
                }
                Err(e) => {
                    log::error!("Employee {} reload failed: {}", id, e);
                    error.set(Some(format!("Не удалось обновить данные сотрудника: {}", e)));
                }
            }
            loading.set(false);
        });
    }

    pub fn save_command(&self, on_saved: Callback<Employee>) {
        let current = self.form.get_untracked();
        if let Err(msg) = current.validate() {
            self.error.set(Some(msg));
            return;
        }

        let error = self.error;
        let saving = self.saving;
        error.set(None);
        saving.set(true);
        spawn_local(async move {
            match api::save_employee(&current).await {
                Ok(saved) => {
                    log::info!("Employee saved: {}", saved.id);
                    saving.set(false);
                    on_saved.run(saved);
                }
                Err(e) => {
                    saving.set(false);
                    error.set(Some(format!("Ошибка сохранения: {}", e)));
                }
            }
        });
    }
}

/// Новый черновик из свежих данных; None, если пользователь уже начал правку
pub fn refreshed_draft(snapshot: &EmployeeDto, current: &EmployeeDto, fresh: &Employee) -> Option<EmployeeDto> {
    (snapshot == current).then(|| EmployeeDto::from_employee(fresh))
}

/// Список магазинов из строки "s1, s2"
pub fn parse_store_ids(raw: &str) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for id in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !ids.iter().any(|x| x == id) {
            ids.push(id.to_string());
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee(first_name: &str) -> Employee {
        serde_json::from_value(serde_json::json!({
            "id": "e1",
            "firstName": first_name,
            "lastName": "Lee",
            "email": "ann@shop.io",
            "storeIds": ["s1"]
        }))
        .unwrap()
    }

    #[test]
    fn test_refreshed_draft() {
        let stale = EmployeeDto::from_employee(&employee("Ann"));
        let fresh = employee("Anna");

        let draft = refreshed_draft(&stale, &stale, &fresh).unwrap();
        assert_eq!(draft.first_name, "Anna");
        assert_eq!(draft.id.as_deref(), Some("e1"));

        let mut edited = stale.clone();
        edited.last_name = "Stone".into();
        assert_eq!(refreshed_draft(&stale, &edited, &fresh), None);
    }

    #[test]
    fn test_parse_store_ids() {
        assert_eq!(parse_store_ids(" s1, s2 ,,s1 "), vec!["s1", "s2"]);
        assert!(parse_store_ids("  ").is_empty());
    }
}
