use orgsync_client::Slot;
use orgsync_core::Id;
use orgsync_core::drafts::{AddressDraft, CoordinatesDraft};

use crate::cli::root_commands::SlotArgs;

/// Slots named on the command line. `None` means the flag group was not used.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SlotChoice {
    pub coordinates: Option<Slot<CoordinatesDraft>>,
    pub address: Option<Slot<AddressDraft>>,
    pub postal_address: Option<Slot<AddressDraft>>,
}

impl From<&SlotArgs> for SlotChoice {
    fn from(args: &SlotArgs) -> Self {
        let coordinates = match (args.coordinates_id, args.x, args.y) {
            (Some(id), _, _) => Some(Slot::Existing(Some(id))),
            (None, Some(x), Some(y)) => Some(Slot::Manual(CoordinatesDraft { x, y })),
            _ => None,
        };
        Self {
            coordinates,
            address: address_slot(args.address_id, args.street.as_ref(), args.zip.as_ref()),
            postal_address: address_slot(
                args.postal_address_id,
                args.postal_street.as_ref(),
                args.postal_zip.as_ref(),
            ),
        }
    }
}

fn address_slot(
    id: Option<Id>,
    street: Option<&String>,
    zip: Option<&String>,
) -> Option<Slot<AddressDraft>> {
    match (id, street, zip) {
        (Some(id), _, _) => Some(Slot::Existing(Some(id))),
        (None, Some(street), Some(zip)) => Some(Slot::Manual(AddressDraft::new(street, zip))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn maps_each_group_independently() {
        let args = SlotArgs {
            x: Some(5),
            y: Some(-10),
            address_id: Some(3),
            postal_street: Some("Main".into()),
            postal_zip: Some("00001".into()),
            ..SlotArgs::default()
        };

        assert_eq!(
            SlotChoice::from(&args),
            SlotChoice {
                coordinates: Some(Slot::Manual(CoordinatesDraft { x: 5, y: -10 })),
                address: Some(Slot::Existing(Some(3))),
                postal_address: Some(Slot::Manual(AddressDraft::new("Main", "00001"))),
            }
        );
    }

    #[test]
    fn unused_groups_stay_empty() {
        assert_eq!(SlotChoice::from(&SlotArgs::default()), SlotChoice::default());
    }
}
