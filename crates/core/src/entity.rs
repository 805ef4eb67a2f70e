//! Records that stores look up by id.

/// A stored record with a stable id.
///
/// Products, cart lines and accounts keep their id for life; only their
/// other fields change.
pub trait Entity {
    type Id: Copy + Eq + core::fmt::Debug;

    fn id(&self) -> &Self::Id;
}

/// Index of the record with `id`, if present.
pub fn position<E: Entity>(records: &[E], id: &E::Id) -> Option<usize> {
    records.iter().position(|r| r.id() == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row(u8);

    impl Entity for Row {
        type Id = u8;

        fn id(&self) -> &u8 {
            &self.0
        }
    }

    #[test]
    fn position_finds_by_id() {
        let rows = [Row(4), Row(9)];
        assert_eq!(position(&rows, &9), Some(1));
        assert_eq!(position(&rows, &1), None);
    }
}
