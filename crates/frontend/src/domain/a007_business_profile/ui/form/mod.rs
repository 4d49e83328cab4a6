//! Профиль компании: реквизиты для счетов, валюта и налог по умолчанию

use crate::domain::a007_business_profile::api;
use crate::shared::form_utils::{non_empty, number_input_value, parse_number};
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_SETTINGS;
use contracts::domain::a007_business_profile::aggregate::BusinessProfile;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

#[derive(Clone, Copy)]
pub struct BusinessProfileViewModel {
    pub form: RwSignal<BusinessProfile>,
    pub error: RwSignal<Option<String>>,
    pub loading: RwSignal<bool>,
    pub saving: RwSignal<bool>,
    pub saved: RwSignal<bool>,
}

impl BusinessProfileViewModel {
    pub fn new() -> Self {
        Self {
            form: RwSignal::new(BusinessProfile::default()),
            error: RwSignal::new(None),
            loading: RwSignal::new(false),
            saving: RwSignal::new(false),
            saved: RwSignal::new(false),
        }
    }

    pub fn load(&self) {
        let this = *self;
        this.loading.set(true);
        spawn_local(async move {
            match api::fetch_business_profile().await {
                Ok(profile) => {
                    if profile.is_empty() {
                        log::info!("Business profile is not filled yet");
                    }
                    this.form.set(profile);
                    this.error.set(None);
                }
                Err(e) => this.error.set(Some(format!("Ошибка загрузки: {}", e))),
            }
            this.loading.set(false);
        });
    }

    pub fn save_command(&self) {
        let current = self.form.get_untracked();
        if let Err(msg) = current.validate() {
            self.error.set(Some(msg));
            return;
        }
        let this = *self;
        this.error.set(None);
        this.saved.set(false);
        this.saving.set(true);
        spawn_local(async move {
            match api::save_business_profile(&current).await {
                Ok(profile) => {
                    this.form.set(profile);
                    this.saved.set(true);
                }
                Err(e) => this.error.set(Some(format!("Ошибка сохранения: {}", e))),
            }
            this.saving.set(false);
        });
    }
}

impl Default for BusinessProfileViewModel {
    fn default() -> Self {
        Self::new()
    }
}

/// Текстовое поле профиля
#[component]
fn TextField(
    #[prop(into)] id: String,
    #[prop(into)] label: String,
    #[prop(into)] value: Signal<String>,
    on_input: Callback<String>,
    #[prop(optional, into)] placeholder: String,
) -> impl IntoView {
    view! {
        <div class="form__group">
            <label for=id.clone()>{label}</label>
            <input
                type="text"
                id=id
                placeholder=placeholder
                prop:value=move || value.get()
                on:input=move |ev| on_input.run(event_target_value(&ev))
            />
        </div>
    }
}

#[component]
pub fn BusinessProfileForm() -> impl IntoView {
    let vm = BusinessProfileViewModel::new();
    vm.load();
    let form = vm.form;

    // Signal для необязательного поля и его обработчик
    let opt = move |get: fn(&BusinessProfile) -> Option<String>| {
        Signal::derive(move || form.with(|f| get(f).unwrap_or_default()))
    };
    let set_opt = move |set: fn(&mut BusinessProfile, Option<String>)| {
        Callback::new(move |value: String| {
            form.update(|f| set(f, non_empty(value)));
            vm.saved.set(false);
        })
    };

    view! {
        <PageFrame page_id="a007_business_profile--settings" category=PAGE_CAT_SETTINGS>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Профиль компании"</h1>
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=move |_| vm.save_command()
                        disabled=Signal::derive(move || vm.saving.get() || vm.loading.get())
                    >
                        {icon("check")}
                        {move || if vm.saving.get() { " Сохранение..." } else { " Сохранить" }}
                    </Button>
                </div>
            </div>

            <div class="page__content">
                {move || vm.error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}
                <Show when=move || vm.saved.get()>
                    <div class="alert alert--success">"Профиль сохранён"</div>
                </Show>
                <Show when=move || vm.loading.get()>
                    <Spinner />
                </Show>

                <div class="details-form business-profile">
                    <TextField
                        id="business_name"
                        label="Название компании"
                        value=Signal::derive(move || form.with(|f| f.business_name.clone()))
                        on_input=Callback::new(move |v: String| {
                            form.update(|f| f.business_name = v);
                            vm.saved.set(false);
                        })
                    />
                    <TextField
                        id="owner_name"
                        label="Владелец"
                        value=opt(|f| f.owner_name.clone())
                        on_input=set_opt(|f, v| f.owner_name = v)
                    />
                    <div class="form__row">
                        <TextField id="email" label="Email" value=opt(|f| f.email.clone()) on_input=set_opt(|f, v| f.email = v) />
                        <TextField id="phone" label="Телефон" value=opt(|f| f.phone.clone()) on_input=set_opt(|f, v| f.phone = v) />
                    </div>
                    <TextField id="address" label="Адрес" value=opt(|f| f.address.clone()) on_input=set_opt(|f, v| f.address = v) />
                    <div class="form__row">
                        <TextField id="tax_id" label="ИНН / Tax ID" value=opt(|f| f.tax_id.clone()) on_input=set_opt(|f, v| f.tax_id = v) />
                        <TextField
                            id="website"
                            label="Сайт"
                            value=opt(|f| f.website.clone())
                            on_input=set_opt(|f, v| f.website = v)
                            placeholder="https://"
                        />
                    </div>
                    <TextField
                        id="logo_url"
                        label="Ссылка на логотип"
                        value=opt(|f| f.logo_url.clone())
                        on_input=set_opt(|f, v| f.logo_url = v)
                        placeholder="https://"
                    />
                    {move || form.with(|f| f.logo_url.clone()).filter(|u| !u.trim().is_empty()).map(|url| view! {
                        <img class="business-profile__logo" src=url alt="logo" />
                    })}

                    <div class="form__row">
                        <TextField
                            id="currency"
                            label="Валюта"
                            value=Signal::derive(move || form.with(|f| f.currency.clone()))
                            on_input=Callback::new(move |v: String| form.update(|f| f.currency = v.trim().to_uppercase()))
                        />
                        <TextField
                            id="invoice_prefix"
                            label="Префикс счетов"
                            value=Signal::derive(move || form.with(|f| f.invoice_prefix.clone()))
                            on_input=Callback::new(move |v: String| form.update(|f| f.invoice_prefix = v))
                        />
                        <div class="form__group">
                            <label for="tax_rate">"Налог по умолчанию, %"</label>
                            <input
                                type="text"
                                inputmode="decimal"
                                id="tax_rate"
                                prop:value=move || form.with(|f| number_input_value(f.tax_rate))
                                on:change=move |ev| {
                                    match parse_number(&event_target_value(&ev)) {
                                        Some(rate) => form.update(|f| f.tax_rate = rate),
                                        None => vm.error.set(Some("Ставка налога должна быть числом".into())),
                                    }
                                }
                            />
                        </div>
                    </div>
                </div>
            </div>
        </PageFrame>
    }
}
