//! Encrypts a short message with every backend this CPU supports and checks they agree.

use sm4_accel::{supported_backends, Backend, Sm4};

fn main() -> Result<(), sm4_accel::Error> {
    let key = *b"sixteen byte key";
    let mut message = [0u8; 80];
    message[..43].copy_from_slice(b"five blocks so the batcher has a tail block");

    let reference = Sm4::new(&key, Backend::Reference)?.encrypt(&message)?;
    for backend in supported_backends() {
        let sm4 = Sm4::new(&key, backend)?;
        let ciphertext = sm4.encrypt(&message)?;
        assert_eq!(ciphertext, reference);
        assert_eq!(sm4.decrypt(&ciphertext)?, message);
        println!("{backend:>9}: {}", hex::encode(&ciphertext[..16]));
    }

    println!("example succeeded; all backends agree");
    Ok(())
}
