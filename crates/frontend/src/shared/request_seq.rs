//! Последовательность запросов: из перекрывающихся запросов побеждает
//! последний отправленный, а не последний завершившийся.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Номер отправленного запроса
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn number(&self) -> u64 {
        self.0
    }
}

/// Счётчик запросов одного источника данных (списка, карточки).
///
/// Клоны делят один счётчик, поэтому клон можно унести в `on_cleanup`.
#[derive(Debug, Clone, Default)]
pub struct RequestSequence {
    latest: Arc<AtomicU64>,
}

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Зарегистрировать новый запрос; все выданные ранее становятся устаревшими
    pub fn next(&self) -> RequestTicket {
        RequestTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Ответ на этот запрос ещё нужен
    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Отбросить все запросы в полёте (компонент размонтирован, параметры сменились)
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_issued_wins() {
        let seq = RequestSequence::new();
        let first = seq.next();
        let second = seq.next();

        // второй запрос завершился раньше первого
        assert!(seq.is_current(second));
        assert!(!seq.is_current(first));
    }

    #[test]
    fn test_invalidate_discards_in_flight() {
        let seq = RequestSequence::new();
        let ticket = seq.next();
        seq.clone().invalidate();
        assert!(!seq.is_current(ticket));

        let fresh = seq.next();
        assert!(seq.is_current(fresh));
        assert!(fresh.number() > ticket.number());
    }
}
