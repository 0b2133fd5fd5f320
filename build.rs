use anyhow::{Ok, Result};
use substreams_ethereum::Abigen;

fn main() -> Result<(), anyhow::Error> {
    Abigen::new("DInterest", "abi/DInterest.json")?
        .generate()?
        .write_to_file("src/abi/d_interest.rs")?;
    Abigen::new("ERC20", "abi/ERC20.json")?
        .generate()?
        .write_to_file("src/abi/erc20.rs")?;
    Abigen::new("IInterestOracle", "abi/IInterestOracle.json")?
        .generate()?
        .write_to_file("src/abi/interest_oracle.rs")?;
    Abigen::new("MPHIssuanceModel01", "abi/MPHIssuanceModel01.json")?
        .generate()?
        .write_to_file("src/abi/mph_issuance_model.rs")?;
    Abigen::new("Vesting02", "abi/Vesting02.json")?
        .generate()?
        .write_to_file("src/abi/vesting.rs")?;
    Ok(())
}
