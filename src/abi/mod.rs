use ethers::contract::abigen;

// Read-only slice of the ERC20 interface; nothing here sends transactions.
abigen!(
    Erc20,
    r#"[
        function balanceOf(address owner) external view returns (uint256)
        function decimals() external view returns (uint8)
        function symbol() external view returns (string)
        function name() external view returns (string)
        function totalSupply() external view returns (uint256)
    ]"#
);
