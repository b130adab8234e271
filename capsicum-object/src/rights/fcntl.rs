use bitflags::bitflags;

bitflags! {
    /// The `fcntl(2)` sub-operations a descriptor may keep.
    ///
    /// A smaller right space than [`RightsSet`], narrowed through the
    /// same monotonic discipline: a new mask must be a subset of the one
    /// currently installed. Bit positions are `1 << F_*` of the command
    /// they permit.
    ///
    /// [`RightsSet`]: super::RightsSet
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FcntlRights: u32 {
        /// Permit `F_GETFL`.
        const GETFL = 1 << 3;
        /// Permit `F_SETFL`.
        const SETFL = 1 << 4;
        /// Permit `F_GETOWN`.
        const GETOWN = 1 << 5;
        /// Permit `F_SETOWN`.
        const SETOWN = 1 << 6;
        /// Every limitable `fcntl(2)` sub-operation.
        const ALL = Self::GETFL.bits()
            | Self::SETFL.bits()
            | Self::GETOWN.bits()
            | Self::SETOWN.bits();
    }
}
