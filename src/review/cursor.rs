use crate::backend::types::Ticket;

/// Ordered list of flagged tickets plus the reviewer's current position.
///
/// Navigation soft-clamps at both ends: advancing past the last ticket or
/// retreating past the first is a no-op, never an error. Whenever the list is
/// non-empty, `position < len` holds.
#[derive(Debug, Default)]
pub struct TicketCursor {
    tickets: Vec<Ticket>,
    position: usize,
}

impl TicketCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the backing list and reset the position to the first ticket.
    pub fn set_tickets(&mut self, tickets: Vec<Ticket>) {
        self.tickets = tickets;
        self.position = 0;
    }

    pub fn current(&self) -> Option<&Ticket> {
        self.tickets.get(self.position)
    }

    pub fn advance(&mut self) {
        if self.position + 1 < self.tickets.len() {
            self.position += 1;
        }
    }

    pub fn retreat(&mut self) {
        if self.position > 0 {
            self.position -= 1;
        }
    }

    pub fn at_end(&self) -> bool {
        self.tickets.is_empty() || self.position + 1 == self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }
}
