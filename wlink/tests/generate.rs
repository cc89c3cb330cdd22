use wlink::vault::{MemoryStorage, Vault, VaultConfig};
use wlink::{derive, mnemonic, Chain, Session, Wallet};

#[test]
fn test_generate_solana_wallet_from_empty_mnemonic() {
    let mut session = Session::new();
    let record = session.generate(Chain::Solana, "", "W1").unwrap();

    let words = record.mnemonic().split_whitespace().count();
    assert!(words == 12 || words == 24);
    assert!(mnemonic::validate(record.mnemonic()));

    let public_key = record.public_key();
    assert!((32..=44).contains(&public_key.len()));
    assert!(bs58_alphabet(public_key));

    // the stored mnemonic and index reproduce the key
    let wallet = Wallet::from_mnemonic(record.mnemonic(), None).unwrap();
    let pair = derive(Chain::Solana, wallet.seed(), 0).unwrap();
    assert_eq!(pair.public_key, public_key);
    assert_eq!(*pair.secret_key, record.secret_key());
}

#[test]
fn test_generated_keys_can_sign_for_their_address() {
    let mut session = Session::new();
    let sol = session.generate(Chain::Solana, "", "S").unwrap();
    let keypair = wlink::sol::Keypair::from_hex(sol.secret_key()).unwrap();
    assert_eq!(keypair.address(), sol.public_key());

    let eth = session.generate(Chain::Ethereum, "", "E").unwrap();
    assert!(!eth.secret_key().starts_with("0x"));
    let signer = wlink::eth::Signer::from_hex(eth.secret_key()).unwrap();
    assert_eq!(signer.checksum_address(), eth.public_key());
}

#[tokio::test]
async fn test_generated_wallets_survive_backup_and_restore() {
    let mut session = Session::new();
    let source = Vault::new(MemoryStorage::default(), VaultConfig::default());
    source.open("pw").await.unwrap();
    for (chain, name) in [(Chain::Solana, "S1"), (Chain::Solana, "S2"), (Chain::Ethereum, "E1")] {
        source
            .add(session.generate(chain, "", name).unwrap())
            .await
            .unwrap();
    }

    let backup = source.export(&Chain::ALL).await.unwrap();
    let target = Vault::new(MemoryStorage::default(), VaultConfig::default());
    target.open("other").await.unwrap();

    let merged = target.import(&backup, "pw").await.unwrap();
    assert_eq!(merged.added(Chain::Solana), 2);
    assert_eq!(merged.added(Chain::Ethereum), 1);
    for chain in Chain::ALL {
        assert_eq!(
            target.list(chain).await.unwrap(),
            source.list(chain).await.unwrap()
        );
    }
}

fn bs58_alphabet(s: &str) -> bool {
    s.chars()
        .all(|c| c.is_ascii_alphanumeric() && !matches!(c, '0' | 'O' | 'I' | 'l'))
}
