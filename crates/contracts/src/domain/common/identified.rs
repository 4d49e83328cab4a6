/// Трейт для записей, у которых есть строковый идентификатор сервера
///
/// Нужен контейнерам состояния, чтобы заменить или удалить одну запись
/// после create/update/delete, не перезагружая весь список.
pub trait Identified {
    /// Получить ID записи
    fn id(&self) -> &str;
}
