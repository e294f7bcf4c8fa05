/// リモート権威サーバの鍵マテリアル。
///
/// - プロセス内で論理的に 1 つだけ存在し、取得後は不変として扱う。
/// - 中身のバイト列の解釈（P-256 スカラーなど）は infra 層の暗号実装に委譲し、
///   ここでは「結果としてのバイト列」のみを扱う。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorityKey(Vec<u8>);

impl AuthorityKey {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
