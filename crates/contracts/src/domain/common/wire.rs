use serde::{Deserialize, Deserializer};

/// `null` в JSON читается как значение по умолчанию.
///
/// Сервер иногда присылает `"permissions": null` или `"storeIds": null`;
/// такие записи должны отображаться, а не ронять разбор всего списка.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
