//! Static catalog of Slither detectors recognized in plain-run output.
//!
//! Order is significant: the findings scan takes the first entry whose id
//! occurs in a line, so an entry shadows every later entry whose id contains
//! it (e.g. `arbitrary-send-erc20` hides `arbitrary-send-erc20-permit`).
//! See [`shadowed_ids`].

use crate::models::vulnerability::Severity;

/// A named static-analysis rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: &'static str,
    pub name: &'static str,
    pub severity: Severity,
    pub recommendation: &'static str,
}

const fn entry(
    id: &'static str,
    name: &'static str,
    severity: Severity,
    recommendation: &'static str,
) -> CatalogEntry {
    CatalogEntry {
        id,
        name,
        severity,
        recommendation,
    }
}

/// Detector catalog in match-priority order.
pub static CATALOG: &[CatalogEntry] = &[
    entry(
        "abiencoderv2-array",
        "Storage abiencoderv2 array",
        Severity::High,
        "Use a compiler >= 0.5.10.",
    ),
    entry(
        "arbitrary-send-erc20",
        "transferFrom uses arbitrary from",
        Severity::High,
        "Use msg.sender as from in transferFrom.",
    ),
    entry(
        "array-by-reference",
        "Modifying storage array by value",
        Severity::High,
        "Ensure the correct usage of memory and storage in the function parameters. Make all the locations explicit.",
    ),
    entry(
        "encode-packed-collision",
        "ABI encodePacked Collision",
        Severity::High,
        "Do not use more than one dynamic type in abi.encodePacked() (see the Solidity documentation). Use abi.encode(), preferably.",
    ),
    entry(
        "incorrect-shift",
        "The order of parameters in a shift instruction is incorrect.",
        Severity::High,
        "Swap the order of parameters.",
    ),
    entry(
        "multiple-constructors",
        "Multiple constructor schemes",
        Severity::High,
        "Only declare one constructor, preferably using the new scheme constructor(...) instead of function <contractName>(...).",
    ),
    entry(
        "name-reused",
        "Contract's name reused",
        Severity::High,
        "Rename the contract.",
    ),
    entry(
        "protected-vars",
        "Detected unprotected variables",
        Severity::High,
        "Add access controls to the vulnerable function",
    ),
    entry(
        "public-mappings-nested",
        "Public mappings with nested variables",
        Severity::High,
        "Do not use public mapping with nested structures.",
    ),
    entry(
        "rtlo",
        "Right-To-Left-Override control character is used",
        Severity::High,
        "Special control characters must not be allowed.",
    ),
    entry(
        "shadowing-state",
        "State variables shadowing",
        Severity::High,
        "Remove the state variable shadowing.",
    ),
    entry(
        "suicidal",
        "Functions allowing anyone to destruct the contract",
        Severity::High,
        "Protect access to all sensitive functions.",
    ),
    entry(
        "uninitialized-state",
        "Uninitialized state variables",
        Severity::High,
        "Initialize all the variables. If a variable is meant to be initialized to zero, explicitly set it to zero to improve code readability.",
    ),
    entry(
        "uninitialized-storage",
        "Uninitialized storage variables",
        Severity::High,
        "Initialize all storage variables.",
    ),
    entry(
        "unprotected-upgrade",
        "Unprotected upgradeable contract",
        Severity::High,
        "Add a constructor to ensure initialize cannot be called on the logic contract.",
    ),
    entry(
        "codex",
        "Use Codex to find vulnerabilities.",
        Severity::High,
        "Review codexs message.",
    ),
    entry(
        "arbitrary-send-erc20-permit",
        "transferFrom uses arbitrary from with permit",
        Severity::High,
        "Ensure that the underlying ERC20 token correctly implements a permit function.",
    ),
    entry(
        "arbitrary-send-eth",
        "Functions that send Ether to arbitrary destinations",
        Severity::High,
        "Ensure that an arbitrary user cannot withdraw unauthorized funds.",
    ),
    entry(
        "controlled-array-length",
        "Array Length Assignment",
        Severity::High,
        "Do not allow array lengths to be set directly set; instead, opt to add values as needed. Otherwise, thoroughly review the contract to ensure a user-controlled variable cannot reach an array length assignment.",
    ),
    entry(
        "controlled-delegatecall",
        "Controlled Delegatecall",
        Severity::High,
        "Avoid using delegatecall. Use only trusted destinations.",
    ),
    entry(
        "delegatecall-loop",
        "Payable functions using delegatecall inside a loop",
        Severity::High,
        "Carefully check that the function called by delegatecall is not payable/doesnt use msg.value.",
    ),
    entry(
        "incorrect-exp",
        "Incorrect exponentiation",
        Severity::High,
        "Use the correct operator ** for exponentiation.",
    ),
    entry(
        "incorrect-return",
        "Incorrect return in assembly",
        Severity::High,
        "Use the leave statement.",
    ),
    entry(
        "msg-value-loop",
        "msg.value inside a loop",
        Severity::High,
        "Provide an explicit array of amounts alongside the receivers array, and check that the sum of all amounts matches msg.value.",
    ),
    entry(
        "return-leave",
        "If a return is used instead of a leave.",
        Severity::High,
        "Use the leave statement.",
    ),
    entry(
        "storage-array",
        "Signed storage integer array compiler bug",
        Severity::High,
        "Use a compiler version >= 0.5.10.",
    ),
    entry(
        "unchecked-transfer",
        "Unchecked tokens transfer",
        Severity::High,
        "Use SafeERC20, or ensure that the transfer/transferFrom return value is checked.",
    ),
    entry(
        "weak-prng",
        "Weak PRNG",
        Severity::High,
        "Do not use block.timestamp, now or blockhash as a source of randomness",
    ),
    entry(
        "domain-separator-collision",
        "Domain separator collision",
        Severity::Medium,
        "Remove or rename the function that collides with DOMAIN_SEPARATOR().",
    ),
    entry(
        "enum-conversion",
        "Detect dangerous enum conversion",
        Severity::Medium,
        "Use a recent compiler version. If solc <0.4.5 is required, check the enum conversion range.",
    ),
    entry(
        "erc20-interface",
        "Incorrect ERC20 interfaces",
        Severity::Medium,
        "Set the appropriate return values and types for the defined ERC20 functions.",
    ),
    entry(
        "erc721-interface",
        "Incorrect ERC721 interfaces",
        Severity::Medium,
        "Set the appropriate return values and vtypes for the defined ERC721 functions.",
    ),
    entry(
        "incorrect-equality",
        "Dangerous strict equalities",
        Severity::Medium,
        "Do not use strict equality to determine if an account has enough Ether or tokens.",
    ),
    entry(
        "contracts-that-lock-ether",
        "Contracts that lock ether",
        Severity::Medium,
        "Remove the payable attribute or add a withdraw function.",
    ),
    entry(
        "mapping-deletion",
        "Deletion on mapping containing a structure",
        Severity::Medium,
        "Use a lock mechanism instead of a deletion to disable structure containing a mapping.",
    ),
    entry(
        "shadowing-abstract",
        "State variables shadowing from abstract contracts",
        Severity::Medium,
        "Remove the state variable shadowing.",
    ),
    entry(
        "tautological-compare",
        "Comparing a variable to itself always returns true or false",
        Severity::Medium,
        "Remove comparison or compare to different value.",
    ),
    entry(
        "tautology",
        "Tautology or contradiction",
        Severity::Medium,
        "Fix the incorrect comparison by changing the value type or the comparison.",
    ),
    entry(
        "write-after-write",
        "Unused write",
        Severity::Medium,
        "Fix or remove the writes",
    ),
    entry(
        "boolean-cst",
        "Misuse of Boolean constant",
        Severity::Medium,
        "Verify and simplify the condition.",
    ),
    entry(
        "constant-function-asm",
        "Constant functions using assembly code",
        Severity::Medium,
        "Ensure the attributes of contracts compiled prior to Solidity 0.5.0 are correct.",
    ),
    entry(
        "constant-function-state",
        "Constant functions changing the state",
        Severity::Medium,
        "Ensure that attributes of contracts compiled prior to Solidity 0.5.0 are correct.",
    ),
    entry(
        "divide-before-multiply",
        "Imprecise arithmetic operations order",
        Severity::Medium,
        "Consider ordering multiplication before division.",
    ),
    entry(
        "out-of-order-retryable",
        "Out-of-order retryable transactions",
        Severity::Medium,
        "Do not rely on the order or successful execution of retryable tickets.",
    ),
    entry(
        "reentrancy-vulnerabilities-1",
        "Reentrancy vulnerabilities (no theft of ethers)",
        Severity::Medium,
        "Apply the check-effects-interactions pattern.",
    ),
    entry(
        "reused-constructor",
        "Reused base constructor",
        Severity::Medium,
        "Remove the duplicate constructor call.",
    ),
    entry(
        "tx-origin",
        "Dangerous usage of tx.origin",
        Severity::Medium,
        "Do not use tx.origin for authorization.",
    ),
    entry(
        "unchecked-low-level-calls",
        "Unchecked low-level calls",
        Severity::Medium,
        "Ensure that the return value of a low-level call is checked or logged.",
    ),
    entry(
        "unchecked-send",
        "Unchecked send",
        Severity::Medium,
        "Ensure that the return value of send is checked or logged.",
    ),
    entry(
        "uninitialized-local",
        "Uninitialized local variables",
        Severity::Medium,
        "Ensure that the return value of send is checked or logged.",
    ),
    entry(
        "unused-return",
        "Unused Return Value",
        Severity::Medium,
        "Ensure that the return value of send is checked or logged.",
    ),
    entry(
        "shadowing-builtin",
        "Builtin Symbol Shadowing",
        Severity::Low,
        "Rename the local variables, state variables, functions, modifiers, and events that shadow a builtin symbol.",
    ),
    entry(
        "missing-events-access-control",
        "Missing Events Access Control",
        Severity::Low,
        "Emit an event for critical parameter changes.",
    ),
    entry(
        "events-maths",
        "Missing events arithmetic",
        Severity::Low,
        "Emit an event for critical parameter changes.",
    ),
    entry(
        "calls-loop",
        "Calls inside a loop",
        Severity::Low,
        "Favor pull over push strategy for external calls.",
    ),
    entry(
        "void-cst",
        "Void constructor",
        Severity::Low,
        "Remove the constructor call.",
    ),
    entry(
        "variable-scope",
        "Pre-declaration usage of local variables",
        Severity::Low,
        "Move all variable declarations prior to any usage of the variable, and ensure that reaching a variable declaration does not depend on some conditional if it is used unconditionally.",
    ),
    entry(
        "shadowing-local",
        "Local variable shadowing",
        Severity::Low,
        "Rename the local variables that shadow another component.",
    ),
    entry(
        "uninitialized-fptr-cst",
        "Uninitialized function pointers in constructors",
        Severity::Low,
        "Initialize function pointers before calling. Avoid function pointers if possible.",
    ),
    entry(
        "incorrect-unary",
        "Dangerous unary expressions",
        Severity::Low,
        "Remove the unary expression.",
    ),
    entry(
        "missing-zero-address-validation",
        "Missing Zero Address Validation",
        Severity::Low,
        "Check that the address is not zero.",
    ),
    entry(
        "reentrancy-vulnerabilities-2",
        "Reentrancy Vulnerabilities (benign reentrancy)",
        Severity::Low,
        "Apply the check-effects-interactions pattern.",
    ),
    entry(
        "reentrancy-vulnerabilities-3",
        "Reentrancy Vulnerabilities (events emitted incorrectly)",
        Severity::Low,
        "Apply the check-effects-interactions pattern.",
    ),
    entry(
        "return-bomb",
        "Return Bomb",
        Severity::Low,
        "Avoid unlimited implicit decoding of returndata.",
    ),
    entry(
        "block-timestamp",
        "Block timestamp",
        Severity::Low,
        "Avoid relying on block.timestamp.",
    ),
    entry(
        "incorrect-modifier",
        "Incorrect modifier",
        Severity::Low,
        "All the paths in a modifier must execute _ or revert.",
    ),
    entry(
        "assembly-usage",
        "Assembly usage",
        Severity::Informational,
        "Do not use evm assembly.",
    ),
    entry(
        "assert-state-change",
        "Assert state change",
        Severity::Informational,
        "Use require for invariants modifying the state.",
    ),
    entry(
        "boolean-equal",
        "Comparison to boolean constant",
        Severity::Informational,
        "Remove the equality to the boolean constant.",
    ),
    entry(
        "cyclomatic-complexity",
        "High cyclomatic complexity",
        Severity::Informational,
        "Reduce cyclomatic complexity by splitting the function into several smaller subroutines.",
    ),
    entry(
        "deprecated-standards",
        "Deprecated Solidity Standards",
        Severity::Informational,
        "Replace all uses of deprecated symbols.",
    ),
    entry(
        "erc20-indexed",
        "Un-indexed ERC20 event parameters",
        Severity::Informational,
        "Add the indexed keyword to event parameters that should include it, according to the ERC20 specification.",
    ),
    entry(
        "function-init-state",
        "Function initializing state variables",
        Severity::Informational,
        "Remove any initialization of state variables via non-constant state variables or function calls. If variables must be set upon contract deployment, locate initialization in the constructor instead.",
    ),
    entry(
        "incorrect-using-for",
        "Incorrect using-for statement",
        Severity::Informational,
        "Make sure that the libraries used in using-for statements have at least one function matching a type used in these statements.",
    ),
    entry(
        "low-level-calls",
        "Low-level calls",
        Severity::Informational,
        "Avoid low-level calls. Check the call success. If the call is meant for a contract, check for code existence.",
    ),
    entry(
        "missing-inheritance",
        "Missing inheritance",
        Severity::Informational,
        "Inherit from the missing interface or contract.",
    ),
    entry(
        "pragma",
        "Different pragma directives are used",
        Severity::Informational,
        "Use one Solidity version.",
    ),
    entry(
        "redundant-statements",
        "Redundant statements",
        Severity::Informational,
        "Remove redundant statements if they congest code but offer no value.",
    ),
    entry(
        "incorrect-version",
        "Incorrect versions of Solidity",
        Severity::Informational,
        "Deploy with a recent version of Solidity (at least 0.8.0) with no known severe issues. Use a simple pragma version that allows any of these versions. Consider using the latest version of Solidity for testing.",
    ),
    entry(
        "unimplemented-functions",
        "Unimplemented functions",
        Severity::Informational,
        "Implement all unimplemented functions in any contract you intend to use directly (not simply inherit from).",
    ),
    entry(
        "unused-import",
        "Unused Import",
        Severity::Informational,
        "Remove the unused import. If the import is needed later, it can be added back.",
    ),
    entry(
        "unused-state",
        "Unused state variable",
        Severity::Informational,
        "Remove unused state variables.",
    ),
    entry(
        "costly-loop",
        "Costly operations in a loop",
        Severity::Informational,
        "Use a local variable to hold the loop computation result.",
    ),
    entry(
        "dead-code",
        "Dead code",
        Severity::Informational,
        "Remove unused functions.",
    ),
    entry(
        "similar-names",
        "Variable names too similar",
        Severity::Informational,
        "Prevent variables from having similar names.",
    ),
    entry(
        "reentrancy-vulnerabilities-4",
        "Reentrancy vulnerabilities (unlimited gas)",
        Severity::Informational,
        "Apply the check-effects-interactions pattern.",
    ),
    entry(
        "too-many-digits",
        "Too many digits",
        Severity::Informational,
        "Use: Ether suffix, Time suffix, or The scientific notation",
    ),
    entry(
        "cache-array-length",
        "Cache array length",
        Severity::Optimization,
        "Cache the lengths of storage arrays if they are used and not modified in for loops",
    ),
    entry(
        "constable-states",
        "State variables that could be declared constant",
        Severity::Optimization,
        "Add the constant attribute to state variables that never change.",
    ),
    entry(
        "external-function",
        "Public function that could be declared external",
        Severity::Optimization,
        "Use the external attribute for functions never called from the contract, and change the location of immutable parameters to calldata to save gas.",
    ),
    entry(
        "immutable-states",
        "State variables that could be declared immutable",
        Severity::Optimization,
        "Add the immutable attribute to state variables that never change or are set only in the constructor.",
    ),
    entry(
        "var-read-using-this",
        "Contract reads its own variable using this",
        Severity::Optimization,
        "Read the variable directly from storage instead of calling the contract.",
    ),
    entry(
        "conformance-to-solidity-naming-convention",
        "Conformance to Solidity naming conventions",
        Severity::Informational,
        "Follow the Solidity naming convention.",
    ),
    entry(
        "reentrancy-vulnerabilities",
        "Reentrancy vulnerabilities (theft of ethers)",
        Severity::High,
        "Apply the check-effects-interactions pattern.",
    ),
];

/// First catalog entry whose id occurs anywhere in `line`.
pub fn lookup(line: &str) -> Option<&'static CatalogEntry> {
    CATALOG.iter().find(|entry| line.contains(entry.id))
}

/// Pairs `(earlier, later)` where the later id can never win because the
/// earlier id is a substring of it.
pub fn shadowed_ids() -> Vec<(&'static str, &'static str)> {
    let mut pairs = Vec::new();
    for (i, earlier) in CATALOG.iter().enumerate() {
        for later in &CATALOG[i + 1..] {
            if later.id.contains(earlier.id) {
                pairs.push((earlier.id, later.id));
            }
        }
    }
    pairs
}
