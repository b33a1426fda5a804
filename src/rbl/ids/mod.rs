mod player_id;
mod room_code;
mod transaction_id;

pub use player_id::PlayerId;
pub use room_code::{RoomCode, RoomCodeError, ROOM_CODE_ALPHABET, ROOM_CODE_LEN};
pub use transaction_id::TransactionId;

use rand::Rng;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Builds a sortable-ish unique id: base36 millisecond timestamp followed by a random base36 tail
pub(crate) fn generate_id<R: Rng + ?Sized>(rng: &mut R, timestamp: u64) -> String {
    let mut id = to_base36(timestamp);

    for _ in 0..11 {
        id.push(BASE36[rng.gen_range(0..BASE36.len())] as char);
    }

    id
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();

    String::from_utf8_lossy(&digits).into_owned()
}
