//! OpenZeppelin 5 contract sources.
//!
//! Upgradeable variants swap constructors for initializers, lock the
//! implementation in the constructor and, for UUPS, restrict upgrades to
//! the owner.

use super::ContractSpec;
use crate::domain::value_objects::{ProxyPattern, TokenStandard};

const OZ: &str = "@openzeppelin/contracts";
const OZU: &str = "@openzeppelin/contracts-upgradeable";

pub fn source(contract: &ContractSpec) -> String {
    let body = if contract.proxy.is_upgradeable() {
        upgradeable(contract)
    } else {
        plain(contract)
    };
    format!("// SPDX-License-Identifier: MIT\npragma solidity ^0.8.20;\n\n{body}")
}

fn plain(contract: &ContractSpec) -> String {
    let name = &contract.name;
    match contract.standard {
        TokenStandard::Erc20 => format!(
            r#"import {{ERC20}} from "{OZ}/token/ERC20/ERC20.sol";
import {{ERC20Burnable}} from "{OZ}/token/ERC20/extensions/ERC20Burnable.sol";
import {{Ownable}} from "{OZ}/access/Ownable.sol";

contract {name} is ERC20, ERC20Burnable, Ownable {{
    constructor(string memory name_, string memory symbol_, uint256 initialSupply)
        ERC20(name_, symbol_)
        Ownable(msg.sender)
    {{
        _mint(msg.sender, initialSupply);
    }}

    function mint(address to, uint256 amount) public onlyOwner {{
        _mint(to, amount);
    }}
}}
"#
        ),
        TokenStandard::Erc721 => format!(
            r#"import {{ERC721}} from "{OZ}/token/ERC721/ERC721.sol";
import {{ERC721URIStorage}} from "{OZ}/token/ERC721/extensions/ERC721URIStorage.sol";
import {{Ownable}} from "{OZ}/access/Ownable.sol";

contract {name} is ERC721, ERC721URIStorage, Ownable {{
    uint256 private _nextTokenId;

    constructor(string memory name_, string memory symbol_)
        ERC721(name_, symbol_)
        Ownable(msg.sender)
    {{}}

    function safeMint(address to, string memory uri) public onlyOwner returns (uint256) {{
        uint256 tokenId = _nextTokenId++;
        _safeMint(to, tokenId);
        _setTokenURI(tokenId, uri);
        return tokenId;
    }}

    function tokenURI(uint256 tokenId)
        public
        view
        override(ERC721, ERC721URIStorage)
        returns (string memory)
    {{
        return super.tokenURI(tokenId);
    }}

    function supportsInterface(bytes4 interfaceId)
        public
        view
        override(ERC721, ERC721URIStorage)
        returns (bool)
    {{
        return super.supportsInterface(interfaceId);
    }}
}}
"#
        ),
        TokenStandard::Erc1155 => format!(
            r#"import {{ERC1155}} from "{OZ}/token/ERC1155/ERC1155.sol";
import {{Ownable}} from "{OZ}/access/Ownable.sol";

contract {name} is ERC1155, Ownable {{
    constructor(string memory uri_) ERC1155(uri_) Ownable(msg.sender) {{}}

    function setURI(string memory newUri) public onlyOwner {{
        _setURI(newUri);
    }}

    function mint(address account, uint256 id, uint256 amount, bytes memory data)
        public
        onlyOwner
    {{
        _mint(account, id, amount, data);
    }}

    function mintBatch(
        address to,
        uint256[] memory ids,
        uint256[] memory amounts,
        bytes memory data
    ) public onlyOwner {{
        _mintBatch(to, ids, amounts, data);
    }}
}}
"#
        ),
    }
}

fn upgradeable(contract: &ContractSpec) -> String {
    let name = &contract.name;
    let uups = contract.proxy == ProxyPattern::Uups;

    let (mut imports, mut bases, params, init, members) = match contract.standard {
        TokenStandard::Erc20 => (
            vec![
                format!("import {{ERC20Upgradeable}} from \"{OZU}/token/ERC20/ERC20Upgradeable.sol\";"),
                format!("import {{ERC20BurnableUpgradeable}} from \"{OZU}/token/ERC20/extensions/ERC20BurnableUpgradeable.sol\";"),
            ],
            vec!["ERC20Upgradeable", "ERC20BurnableUpgradeable"],
            "string memory name_, string memory symbol_, uint256 initialSupply",
            vec!["__ERC20_init(name_, symbol_);", "__ERC20Burnable_init();"],
            r#"
    function mint(address to, uint256 amount) public onlyOwner {
        _mint(to, amount);
    }
"#
            .to_string(),
        ),
        TokenStandard::Erc721 => (
            vec![
                format!("import {{ERC721Upgradeable}} from \"{OZU}/token/ERC721/ERC721Upgradeable.sol\";"),
                format!("import {{ERC721URIStorageUpgradeable}} from \"{OZU}/token/ERC721/extensions/ERC721URIStorageUpgradeable.sol\";"),
            ],
            vec!["ERC721Upgradeable", "ERC721URIStorageUpgradeable"],
            "string memory name_, string memory symbol_",
            vec!["__ERC721_init(name_, symbol_);", "__ERC721URIStorage_init();"],
            r#"
    function safeMint(address to, string memory uri) public onlyOwner returns (uint256) {
        uint256 tokenId = _nextTokenId++;
        _safeMint(to, tokenId);
        _setTokenURI(tokenId, uri);
        return tokenId;
    }

    function tokenURI(uint256 tokenId)
        public
        view
        override(ERC721Upgradeable, ERC721URIStorageUpgradeable)
        returns (string memory)
    {
        return super.tokenURI(tokenId);
    }

    function supportsInterface(bytes4 interfaceId)
        public
        view
        override(ERC721Upgradeable, ERC721URIStorageUpgradeable)
        returns (bool)
    {
        return super.supportsInterface(interfaceId);
    }
"#
            .to_string(),
        ),
        TokenStandard::Erc1155 => (
            vec![format!(
                "import {{ERC1155Upgradeable}} from \"{OZU}/token/ERC1155/ERC1155Upgradeable.sol\";"
            )],
            vec!["ERC1155Upgradeable"],
            "string memory uri_",
            vec!["__ERC1155_init(uri_);"],
            r#"
    function setURI(string memory newUri) public onlyOwner {
        _setURI(newUri);
    }

    function mint(address account, uint256 id, uint256 amount, bytes memory data)
        public
        onlyOwner
    {
        _mint(account, id, amount, data);
    }

    function mintBatch(
        address to,
        uint256[] memory ids,
        uint256[] memory amounts,
        bytes memory data
    ) public onlyOwner {
        _mintBatch(to, ids, amounts, data);
    }
"#
            .to_string(),
        ),
    };

    imports.insert(
        0,
        format!("import {{Initializable}} from \"{OZU}/proxy/utils/Initializable.sol\";"),
    );
    imports.push(format!(
        "import {{OwnableUpgradeable}} from \"{OZU}/access/OwnableUpgradeable.sol\";"
    ));
    bases.insert(0, "Initializable");
    bases.push("OwnableUpgradeable");

    let mut init: Vec<String> = init.into_iter().map(String::from).collect();
    init.push("__Ownable_init(msg.sender);".into());
    if uups {
        imports.push(format!(
            "import {{UUPSUpgradeable}} from \"{OZU}/proxy/utils/UUPSUpgradeable.sol\";"
        ));
        bases.push("UUPSUpgradeable");
        init.push("__UUPSUpgradeable_init();".into());
    }
    if contract.standard == TokenStandard::Erc20 {
        init.push("_mint(msg.sender, initialSupply);".into());
    }

    let state = if contract.standard == TokenStandard::Erc721 {
        "    uint256 private _nextTokenId;\n\n"
    } else {
        ""
    };
    let authorize = if uups {
        "\n    function _authorizeUpgrade(address newImplementation) internal override onlyOwner {}\n"
    } else {
        ""
    };
    let init_body = init
        .iter()
        .map(|line| format!("        {line}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"{imports}

contract {name} is {bases} {{
{state}    /// @custom:oz-upgrades-unsafe-allow constructor
    constructor() {{
        _disableInitializers();
    }}

    function initialize({params}) public initializer {{
{init_body}
    }}
{members}{authorize}}}
"#,
        imports = imports.join("\n"),
        bases = bases.join(", "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contract(standard: TokenStandard, proxy: ProxyPattern) -> ContractSpec {
        ContractSpec {
            name: "MyToken".into(),
            standard,
            proxy,
        }
    }

    #[test]
    fn erc20_mints_and_burns() {
        let src = source(&contract(TokenStandard::Erc20, ProxyPattern::None));
        assert!(src.starts_with("// SPDX-License-Identifier: MIT\npragma solidity ^0.8.20;"));
        assert!(src.contains("contract MyToken is ERC20, ERC20Burnable, Ownable {"));
        assert!(src.contains("function mint(address to, uint256 amount) public onlyOwner"));
    }

    #[test]
    fn erc721_uses_uri_storage() {
        let src = source(&contract(TokenStandard::Erc721, ProxyPattern::None));
        assert!(src.contains("ERC721URIStorage"));
        assert!(src.contains("function safeMint(address to, string memory uri)"));
    }

    #[test]
    fn erc1155_exposes_mint_batch() {
        let src = source(&contract(TokenStandard::Erc1155, ProxyPattern::None));
        assert!(src.contains("function mint(address account, uint256 id"));
        assert!(src.contains("function mintBatch("));
        assert!(src.contains("function setURI(string memory newUri)"));
    }

    #[test]
    fn uups_variant_authorizes_upgrades() {
        let src = source(&contract(TokenStandard::Erc20, ProxyPattern::Uups));
        assert!(src.contains(
            "contract MyToken is Initializable, ERC20Upgradeable, ERC20BurnableUpgradeable, OwnableUpgradeable, UUPSUpgradeable {"
        ));
        assert!(src.contains("_disableInitializers();"));
        assert!(src.contains("function initialize(string memory name_, string memory symbol_, uint256 initialSupply) public initializer"));
        assert!(src.contains("_authorizeUpgrade(address newImplementation) internal override onlyOwner"));
        assert!(!src.contains("constructor(string"));
    }

    #[test]
    fn transparent_variant_has_no_upgrade_hook() {
        let src = source(&contract(TokenStandard::Erc1155, ProxyPattern::Transparent));
        assert!(src.contains("__ERC1155_init(uri_);"));
        assert!(!src.contains("UUPSUpgradeable"));
        assert!(!src.contains("_authorizeUpgrade"));
    }
}
